//! Authentication HTTP Handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::{AuthError, AuthResult};
use super::jwt::{generate_token_pair, validate_refresh_token, TokenPair};
use super::password::verify_password;
use crate::api::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Token refresh / logout request.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    #[serde(alias = "refresh_token")]
    pub refresh: String,
}

/// Token pair response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Access token (short-lived).
    pub access: String,
    /// Refresh token (long-lived).
    pub refresh: String,
    /// Access token expiry in seconds.
    pub expires_in: i64,
    /// Token type (always "Bearer").
    pub token_type: &'static str,
}

impl From<TokenPair> for TokenResponse {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access: tokens.access_token,
            refresh: tokens.refresh_token,
            expires_in: tokens.access_expires_in,
            token_type: "Bearer",
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Login with username/password.
///
/// POST /api/users/login
#[tracing::instrument(skip(state, body), fields(username = %body.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AuthResult<Json<TokenResponse>> {
    let user = state
        .store
        .find_user_by_username(&body.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    // Accounts created by an admin without a password cannot log in
    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&body.password, password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let tokens = generate_token_pair(
        user.id,
        &state.config.jwt_secret,
        state.config.jwt_access_expiry,
        state.config.jwt_refresh_expiry,
    )?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(tokens.into()))
}

/// Exchange a refresh token for a new pair. The presented token is revoked.
///
/// POST /api/users/refresh
#[tracing::instrument(skip(state, body))]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AuthResult<Json<TokenResponse>> {
    let claims = validate_refresh_token(&body.refresh, &state.config.jwt_secret)?;
    let jti = claims.token_id()?;
    let user_id = claims.user_id()?;

    if state.store.is_token_revoked(jti).await? {
        return Err(AuthError::TokenRevoked);
    }

    // Verify user still exists
    state
        .store
        .find_user(user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    // Rotation: a concurrent refresh with the same token loses here
    if !state.store.revoke_token(jti, claims.expires_at()?).await? {
        return Err(AuthError::TokenRevoked);
    }

    let tokens = generate_token_pair(
        user_id,
        &state.config.jwt_secret,
        state.config.jwt_access_expiry,
        state.config.jwt_refresh_expiry,
    )?;

    tracing::info!(user_id = %user_id, "Token refreshed");

    Ok(Json(tokens.into()))
}

/// Validate a refresh token and blacklist it, returning its subject.
async fn revoke_refresh_token(
    state: &AppState,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> AuthResult<String> {
    let Json(body) = body.map_err(|_| AuthError::InvalidRefreshToken)?;
    let claims = validate_refresh_token(&body.refresh, &state.config.jwt_secret)?;
    let jti = claims.token_id()?;

    if !state.store.revoke_token(jti, claims.expires_at()?).await? {
        return Err(AuthError::TokenRevoked);
    }
    Ok(claims.sub)
}

/// Blacklist a refresh token.
///
/// Open to anonymous callers. Every failure, whatever its cause, is reported
/// as the same `400 {"error": "Invalid refresh token"}`.
///
/// POST /api/users/logout
#[tracing::instrument(skip(state, body))]
pub async fn logout(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse> {
    match revoke_refresh_token(&state, body).await {
        Ok(user_id) => {
            tracing::info!(user_id = %user_id, "User logged out");
            Ok((
                StatusCode::RESET_CONTENT,
                Json(json!({ "message": "Logout successful" })),
            ))
        }
        Err(err) => {
            tracing::debug!(error = %err, "Logout rejected");
            Err(AuthError::InvalidRefreshToken)
        }
    }
}
