//! `Clubhub` Server - Main Entry Point

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use clubhub_server::{api, config, db, users};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubhub_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        events_require_auth_to_read = config.events_require_auth_to_read,
        "Starting Clubhub Server"
    );

    // Initialize storage
    let store: Arc<dyn db::Store> = if let Some(url) = config.database_url.as_deref() {
        let pool = db::create_pool(url).await?;
        db::run_migrations(&pool).await?;
        Arc::new(db::PgStore::new(pool))
    } else {
        warn!("DATABASE_URL not set, using in-memory store. Data will not survive a restart.");
        Arc::new(db::MemoryStore::new())
    };

    if let Some((username, password)) = config.bootstrap_admin() {
        users::ensure_bootstrap_admin(store.as_ref(), username, password).await?;
    } else if !config.has_database() {
        warn!("BOOTSTRAP_ADMIN_USERNAME/PASSWORD not set, no administrator can be created.");
    }

    // Build application state and router
    let bind_address = config.bind_address.clone();
    let state = api::AppState::new(store, config);
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
