use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use hearth_shopping::{AddRecipeInput, AddRecipeOutcome, CreateRecipeInput};
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::Auth;
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// POST /api/recipes
#[tracing::instrument(skip(state, input), fields(user_id = %auth.user_id))]
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<CreateRecipeInput>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = state.command.create_recipe(input).await?;

    tracing::info!(recipe_id = %id, "recipe created");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// POST /api/recipes/{id}/add-to-list
///
/// Imports every ingredient of the recipe into the chosen list, or the
/// household's default list when `listId` is absent.
#[tracing::instrument(skip(state, input), fields(user_id = %auth.user_id))]
pub async fn add_to_list(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
    Json(mut input): Json<AddRecipeInput>,
) -> Result<Json<AddRecipeOutcome>, AppError> {
    input.recipe_id = id;

    let outcome = state.command.add_recipe(input, &auth.user_id).await?;

    Ok(Json(outcome))
}
