use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use hearth_shopping::{
    AddItemInput, ConfirmAction, ConfirmOutcome, MergeOutcome, ShoppingItem, ShoppingList,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::middleware::Auth;
use crate::routes::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmInput {
    #[validate(length(min = 1, max = 500))]
    pub item_ids: Vec<String>,
    pub action: ConfirmAction,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MergeInput {
    #[validate(length(min = 1, max = 64))]
    pub list_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteInput {
    pub is_complete: bool,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    #[serde(flatten)]
    pub list: ShoppingList,
    pub items: Vec<ShoppingItem>,
}

/// POST /api/shopping-lists/confirm-auto-added
#[tracing::instrument(skip(state, input), fields(user_id = %auth.user_id, action = %input.action))]
pub async fn confirm_auto_added(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<ConfirmInput>,
) -> Result<Json<ConfirmOutcome>, AppError> {
    input.validate()?;

    let outcome = state.command.resolve(input.item_ids, input.action).await?;

    Ok(Json(outcome))
}

/// POST /api/shopping-lists/merge-duplicates
#[tracing::instrument(skip(state, input), fields(user_id = %auth.user_id, list_id = %input.list_id))]
pub async fn merge_duplicates(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<MergeInput>,
) -> Result<Json<MergeOutcome>, AppError> {
    input.validate()?;

    let outcome = state.command.merge_duplicates(&input.list_id).await?;

    Ok(Json(outcome))
}

/// GET /api/shopping-lists/{id}
#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListResponse>, AppError> {
    let Some(list) = state.query.find_list(&id).await? else {
        return Err(AppError::NotFound(format!("shopping list {id} not found")));
    };

    let items = state.query.list_items(&id).await?;

    Ok(Json(ListResponse { list, items }))
}

/// GET /api/shopping-lists/{id}/pending
#[tracing::instrument(skip(state))]
pub async fn pending(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ShoppingItem>>, AppError> {
    if state.query.find_list(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("shopping list {id} not found")));
    }

    Ok(Json(state.query.pending_items(&id).await?))
}

/// POST /api/shopping-lists/{id}/items
#[tracing::instrument(skip(state, input), fields(user_id = %auth.user_id))]
pub async fn add_item(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
    Json(input): Json<AddItemInput>,
) -> Result<(StatusCode, Json<ShoppingItem>), AppError> {
    let item = state.command.add_item(&id, input, &auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/shopping-items/{id}/complete
#[tracing::instrument(skip(state, input), fields(user_id = %auth.user_id))]
pub async fn set_complete(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
    Json(input): Json<CompleteInput>,
) -> Result<Json<ShoppingItem>, AppError> {
    let item = state.command.set_item_complete(&id, input.is_complete).await?;

    Ok(Json(item))
}
