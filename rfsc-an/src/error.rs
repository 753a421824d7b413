//! Error types for rfsc-an

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session with this id (404)
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// rfsc-common error (status depends on kind)
    #[error(transparent)]
    Core(#[from] rfsc_common::Error),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        use rfsc_common::Error as Core;

        match self {
            ApiError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Core(err) => match err {
                Core::Decode(_) => (StatusCode::BAD_REQUEST, "DECODE_ERROR"),
                Core::Parse { .. } => (StatusCode::BAD_REQUEST, "PARSE_ERROR"),
                Core::Range { .. } => (StatusCode::BAD_REQUEST, "RANGE_ERROR"),
                Core::InvalidInput(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
                Core::Compute(_) => (StatusCode::UNPROCESSABLE_ENTITY, "COMPUTE_ERROR"),
                Core::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
                Core::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code = error_code, "{}", self);
        } else {
            tracing::debug!(code = error_code, "{}", self);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
