//! Authentication Middleware

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::AppState;
use crate::permissions::Identity;

use super::error::{AuthError, AuthResult};
use super::jwt::validate_access_token;

/// Pull the Bearer token out of an `Authorization` header value.
fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
}

/// Turn an access token into the identity of a still-existing account.
async fn authenticate(state: &AppState, token: &str) -> AuthResult<Identity> {
    let claims = validate_access_token(token, &state.config.jwt_secret)?;
    let user_id = claims.user_id()?;

    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    Ok(Identity::from(&user))
}

/// Middleware resolving the request principal.
///
/// A missing, malformed or expired token, or one whose account has since been
/// deleted, yields [`Identity::Anonymous`]. Whether anonymous callers may
/// proceed is decided per operation by the permission evaluator. Only a store
/// failure while loading the account rejects the request (500).
///
/// # Usage
///
/// ```ignore
/// Router::new()
///     .route("/api/clubs", get(handler))
///     .layer(axum::middleware::from_fn_with_state(state, resolve_identity))
/// ```
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match bearer_token(&request) {
        Some(token) => match authenticate(&state, &token).await {
            Ok(identity) => identity,
            // Unknown is not the same as absent
            Err(err @ AuthError::Database(_)) => return err.into_response(),
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring unusable access token");
                Identity::Anonymous
            }
        },
        None => Identity::Anonymous,
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

/// Extractor for the request principal in handlers.
///
/// ```ignore
/// async fn handler(identity: Identity) -> impl IntoResponse {
///     format!("{:?}", identity.role())
/// }
/// ```
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_default())
    }
}
