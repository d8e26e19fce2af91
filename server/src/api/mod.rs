//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{
    extract::DefaultBodyLimit, extract::State, middleware::from_fn_with_state, routing::get, Json,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{access::ResourceAccess, auth, clubs, config::Config, db::Store, events, users};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Persistent storage
    pub store: Arc<dyn Store>,
    /// Server configuration
    pub config: Arc<Config>,
    /// Permission-checked operations over `store`
    pub access: ResourceAccess,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let access = ResourceAccess::new(Arc::clone(&store), config.access_policy());
        Self {
            store,
            config: Arc::new(config),
            access,
        }
    }

    /// Base URL for stored media references, if configured.
    #[must_use]
    pub fn media_base(&self) -> Option<&str> {
        self.config.media_base_url.as_deref()
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_body_size = state.config.max_body_size;

    let admin_routes = clubs::admin_router().merge(users::admin_router());

    let me_routes = Router::new()
        .route("/liked-posts", get(clubs::handlers::my_liked_posts))
        .route("/followed-events", get(events::handlers::my_followed_events));

    // Every API route sees an Identity; anonymous callers are rejected per operation
    let api_routes = Router::new()
        .nest("/api/users", users::router())
        .nest("/api/clubs", clubs::router())
        .nest("/api/posts", clubs::posts_router())
        .nest("/api/events", events::router())
        .nest("/api/me", me_routes)
        .nest("/api/admin", admin_routes)
        .layer(from_fn_with_state(state.clone(), auth::resolve_identity));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(api_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(DefaultBodyLimit::max(max_body_size))
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Whether a database is configured (otherwise in-memory)
    database: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        database: state.config.has_database(),
    })
}
