//! Clubs and Club Posts
//!
//! Public browsing, follow/like toggles, and the admin management surface.

pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;

use crate::api::AppState;

/// Public club routes, nested under `/api/clubs`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_clubs))
        .route("/{id}", get(handlers::get_club))
        .route("/{id}/follow", post(handlers::toggle_follow))
        .route(
            "/{id}/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
}

/// Post routes, nested under `/api/posts`.
pub fn posts_router() -> Router<AppState> {
    Router::new().route("/{id}/like", post(handlers::toggle_like))
}

/// Admin routes, nested under `/api/admin`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/clubs",
            get(handlers::admin_list_clubs).post(handlers::admin_create_club),
        )
        .route(
            "/clubs/{id}",
            get(handlers::admin_get_club)
                .put(handlers::admin_update_club)
                .patch(handlers::admin_update_club)
                .delete(handlers::admin_delete_club),
        )
        .route(
            "/posts/{id}",
            get(handlers::admin_get_post)
                .put(handlers::admin_update_post)
                .patch(handlers::admin_update_post)
                .delete(handlers::admin_delete_post),
        )
}
