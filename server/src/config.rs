//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

use crate::permissions::AccessPolicy;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// `PostgreSQL` connection URL. Without it the server runs on an in-memory store.
    pub database_url: Option<String>,

    /// JWT signing secret (HS256)
    pub jwt_secret: String,

    /// JWT access token expiry in seconds (default: 900 = 15 min)
    pub jwt_access_expiry: i64,

    /// JWT refresh token expiry in seconds (default: 604800 = 7 days)
    pub jwt_refresh_expiry: i64,

    /// Whether listing/reading events requires authentication (default: true)
    pub events_require_auth_to_read: bool,

    /// Base URL prepended to stored image/file references (optional)
    pub media_base_url: Option<String>,

    /// Maximum request body size in bytes (default: 10MB)
    pub max_body_size: usize,

    /// Administrator account created at startup if missing (optional)
    pub bootstrap_admin_username: Option<String>,

    /// Password for the bootstrap administrator
    pub bootstrap_admin_password: Option<String>,
}

/// Parse a boolean environment value (`1/0`, `true/false`, `yes/no`).
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_access_expiry: env::var("JWT_ACCESS_EXPIRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900),
            jwt_refresh_expiry: env::var("JWT_REFRESH_EXPIRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(604_800),
            events_require_auth_to_read: env::var("EVENTS_REQUIRE_AUTH_TO_READ")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            media_base_url: env::var("MEDIA_BASE_URL")
                .ok()
                .map(|s| s.trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),
            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024), // 10MB
            bootstrap_admin_username: env::var("BOOTSTRAP_ADMIN_USERNAME")
                .ok()
                .filter(|s| !s.is_empty()),
            bootstrap_admin_password: env::var("BOOTSTRAP_ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
        })
    }

    /// Access policy derived from this configuration.
    #[must_use]
    pub const fn access_policy(&self) -> AccessPolicy {
        AccessPolicy {
            events_require_auth_to_read: self.events_require_auth_to_read,
        }
    }

    /// Bootstrap administrator credentials, when both halves are set.
    #[must_use]
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        Some((
            self.bootstrap_admin_username.as_deref()?,
            self.bootstrap_admin_password.as_deref()?,
        ))
    }

    /// Check if a database is configured.
    #[must_use]
    pub const fn has_database(&self) -> bool {
        self.database_url.is_some()
    }

    /// Create a default configuration for testing.
    ///
    /// No database: tests run against the in-memory store.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            database_url: None,
            jwt_secret: "test-secret".into(),
            jwt_access_expiry: 900,
            jwt_refresh_expiry: 604_800,
            events_require_auth_to_read: true,
            media_base_url: None,
            max_body_size: 10 * 1024 * 1024,
            bootstrap_admin_username: None,
            bootstrap_admin_password: None,
        }
    }
}
