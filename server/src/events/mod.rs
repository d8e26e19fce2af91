//! Events
//!
//! Dated events users can follow. Reads may require authentication depending
//! on `EVENTS_REQUIRE_AUTH_TO_READ`.

pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;

use crate::api::AppState;

/// Create the events router, nested under `/api/events`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_events).post(handlers::create_event))
        .route(
            "/{id}",
            get(handlers::get_event)
                .put(handlers::update_event)
                .patch(handlers::update_event)
                .delete(handlers::delete_event),
        )
        .route("/{id}/toggle-follow", post(handlers::toggle_follow))
}
