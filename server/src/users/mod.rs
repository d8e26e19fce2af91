//! User Accounts
//!
//! Registration, the self-service profile, and admin account management.
//! Login, refresh and logout live in [`crate::auth`].

pub mod handlers;
pub mod types;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;

use crate::api::AppState;
use crate::auth;
use crate::db::{NewUser, Store, StoreError};

/// Account routes, nested under `/api/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route(
            "/me",
            get(handlers::get_me)
                .put(handlers::update_me)
                .patch(handlers::update_me),
        )
        .merge(auth::router())
}

/// Admin routes, nested under `/api/admin`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(handlers::admin_list_users).post(handlers::admin_create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::admin_get_user)
                .put(handlers::admin_update_user)
                .patch(handlers::admin_update_user)
                .delete(handlers::admin_delete_user),
        )
}

/// Create the administrator account named by the deployment if it does not
/// exist yet. An existing account of that name is left untouched.
///
/// Returns whether an account was created.
pub async fn ensure_bootstrap_admin(
    store: &dyn Store,
    username: &str,
    password: &str,
) -> Result<bool> {
    if store.find_user_by_username(username).await?.is_some() {
        tracing::debug!(username, "Bootstrap administrator already exists");
        return Ok(false);
    }

    let inserted = store
        .insert_user(NewUser {
            username: username.to_string(),
            email: String::new(),
            password_hash: Some(auth::hash_password(password)?),
            is_admin: true,
            profile_image: None,
        })
        .await;

    match inserted {
        Ok(user) => {
            tracing::info!(user_id = %user.id, username, "Bootstrap administrator created");
            Ok(true)
        }
        // Lost a race with another instance
        Err(StoreError::Conflict(_)) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
