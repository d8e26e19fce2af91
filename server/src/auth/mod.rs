//! Authentication Service
//!
//! Token issuance, rotation and blacklisting, password hashing, and the
//! middleware that turns a Bearer token into an [`Identity`](crate::permissions::Identity).

mod error;
mod handlers;
pub mod jwt;
mod middleware;
mod password;

use axum::{routing::post, Router};

use crate::api::AppState;

pub use error::{AuthError, AuthResult};
pub use middleware::resolve_identity;
pub use password::{hash_password, verify_password};

/// Create authentication router.
///
/// All routes are public:
/// - POST /login - Obtain a token pair
/// - POST /refresh - Rotate a refresh token
/// - POST /logout - Blacklist a refresh token
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh_token))
        .route("/logout", post(handlers::logout))
}
