//! API Error Types
//!
//! Boundary error for the resource endpoints. Every failure the access layer
//! can produce ends up here and is rendered as `{"error", "message"}` JSON.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::db::StoreError;
use crate::permissions::AccessError;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Referenced entity is absent.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// No identity where one is required, or the identity lacks the role.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Uniqueness violation.
    #[error("{0} already exists")]
    Conflict(String),

    /// Malformed input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Credential or token failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database error.
    #[error("Database error")]
    Database(#[source] sqlx::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(what) => Self::Conflict(what),
            StoreError::Database(e) => Self::Database(e),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Error response body for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            Self::Auth(err) => return err.into_response(),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Access(AccessError::Unauthorized) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Access(AccessError::Forbidden) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Database(ref err) => {
                tracing::error!(error = %err, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
