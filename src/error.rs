use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<hearth_shared::Error> for AppError {
    fn from(err: hearth_shared::Error) -> Self {
        match err {
            hearth_shared::Error::NotFound(msg) => AppError::NotFound(msg),
            hearth_shared::Error::User(msg) => AppError::Validation(msg),
            hearth_shared::Error::Validate(errors) => AppError::Validation(errors.to_string()),
            hearth_shared::Error::Server(msg) => AppError::Internal(msg),
            hearth_shared::Error::Unknown(err) => AppError::Internal(format!("{err:#}")),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NotFound",
            AppError::Validation(_) => "ValidationFailed",
            AppError::Database(_) => "DatabaseError",
            AppError::Internal(_) => "InternalServerError",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_owned()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.to_owned()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred. Please try again later.".to_owned(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again later.".to_owned(),
                )
            }
        };

        let body = json!({
            "error": self.kind(),
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                AppError::from(hearth_shared::Error::NotFound("missing".to_owned())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(hearth_shared::Error::User("bad".to_owned())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::from(hearth_shared::Error::Server("boom".to_owned())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(hearth_shared::Error::Unknown(anyhow::anyhow!("boom"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
