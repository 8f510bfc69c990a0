use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors.
///
/// Load and Build are fatal at startup; NotFound is recovered per request and
/// surfaced to the caller as the user-visible message.
#[derive(thiserror::Error, Debug)]
pub enum RecError {
    #[error("Failed to load dataset: {0}")]
    Load(String),

    #[error("Failed to build similarity matrix: {0}")]
    Build(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<csv::Error> for RecError {
    fn from(e: csv::Error) -> Self {
        RecError::Load(e.to_string())
    }
}

impl IntoResponse for RecError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RecError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            RecError::Load(_) | RecError::Build(_) | RecError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type RecResult<T> = Result<T, RecError>;
