/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use encore_core::EncoreError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error(transparent)]
    Engine(#[from] EncoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl From<encore_storage::StorageError> for ServerError {
    fn from(err: encore_storage::StorageError) -> Self {
        // StorageError -> EncoreError -> ServerError
        ServerError::Engine(err.into())
    }
}

fn engine_status(err: &EncoreError) -> (StatusCode, String) {
    match err {
        EncoreError::NotAuthenticated => (StatusCode::UNAUTHORIZED, err.to_string()),
        EncoreError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        EncoreError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        EncoreError::Restricted(_) => (StatusCode::FORBIDDEN, err.to_string()),
        EncoreError::Conflict { .. } => (StatusCode::CONFLICT, err.to_string()),
        EncoreError::ContinuationUnavailable
        | EncoreError::Collaborator(_)
        | EncoreError::Storage(_) => {
            tracing::error!("Engine error: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServerError::Engine(ref e) => engine_status(e),
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Jwt(ref e) => {
                tracing::warn!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
