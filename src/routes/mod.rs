use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use sqlx::SqlitePool;

mod health;
mod recipes;
mod shopping_list;

pub use health::{health, ready};

#[derive(Clone)]
pub struct AppState {
    pub command: hearth_shopping::Command,
    pub query: hearth_shopping::Query,
    pub pool: SqlitePool,
}

pub fn router(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/api/recipes", post(recipes::create))
        .route("/api/recipes/{id}/add-to-list", post(recipes::add_to_list))
        .route(
            "/api/shopping-lists/confirm-auto-added",
            post(shopping_list::confirm_auto_added),
        )
        .route(
            "/api/shopping-lists/merge-duplicates",
            post(shopping_list::merge_duplicates),
        )
        .route("/api/shopping-lists/{id}", get(shopping_list::show))
        .route("/api/shopping-lists/{id}/pending", get(shopping_list::pending))
        .route("/api/shopping-lists/{id}/items", post(shopping_list::add_item))
        .route(
            "/api/shopping-items/{id}/complete",
            put(shopping_list::set_complete),
        )
        .layer(middleware::from_fn(crate::middleware::auth_middleware))
        .with_state(app_state.clone());

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .merge(api)
}
