//! Authentication Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;
use crate::error::ErrorResponse;

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials (wrong username/password).
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Invalid or expired token.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Refresh token was already blacklisted.
    #[error("Token has been revoked")]
    TokenRevoked,

    /// Logout failed. The cause is deliberately not distinguished.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// Password hashing error.
    #[error("Password processing failed")]
    PasswordHash,

    /// Database error.
    #[error("Database error")]
    Database(#[source] StoreError),

    /// Signing a token failed. Decode failures map to
    /// [`Self::InvalidToken`] or [`Self::TokenExpired`] instead.
    #[error("Token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        Self::Database(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            Self::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            Self::TokenRevoked => (StatusCode::UNAUTHORIZED, "TOKEN_REVOKED"),
            Self::InvalidRefreshToken => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid refresh token" })),
                )
                    .into_response();
            }
            Self::PasswordHash | Self::Database(_) | Self::Jwt(_) => {
                tracing::error!(error = ?self, "Authentication failure");
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

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_logout_error_is_coarse() {
        let response = AuthError::InvalidRefreshToken.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("Invalid JSON");
        assert_eq!(body, json!({ "error": "Invalid refresh token" }));
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::InvalidToken,
            AuthError::TokenExpired,
            AuthError::TokenRevoked,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_server_side_failures_are_500() {
        let signing = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidKeyFormat,
        );
        for err in [
            AuthError::Jwt(signing),
            AuthError::PasswordHash,
            AuthError::Database(StoreError::Database(sqlx::Error::PoolTimedOut)),
        ] {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
