//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router backed by a fresh [`MemoryStore`], plus utilities for seeding users
//! and generating JWTs.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use clubhub_server::api::{create_router, AppState};
use clubhub_server::auth::{hash_password, jwt};
use clubhub_server::config::Config;
use clubhub_server::db::{MemoryStore, NewUser, Store};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// Password given to every seeded account.
pub const TEST_PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Create a new test app with the default test config.
    pub fn new() -> Self {
        Self::with_config(Config::default_for_test())
    }

    /// Create a test app with a custom config.
    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config.clone());
        let router = create_router(state);

        Self {
            router,
            store,
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// Send a JSON request, optionally authenticated.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Self::request(method, uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_string(&json).unwrap())
            }
            None => Body::empty(),
        };
        self.oneshot(builder.body(body).unwrap()).await
    }

    /// Seed a regular user and return `(user_id, access_token)`.
    pub async fn create_user(&self, username: &str) -> (Uuid, String) {
        self.seed(username, false).await
    }

    /// Seed an admin and return `(user_id, access_token)`.
    pub async fn create_admin(&self, username: &str) -> (Uuid, String) {
        self.seed(username, true).await
    }

    async fn seed(&self, username: &str, is_admin: bool) -> (Uuid, String) {
        let user = self
            .store
            .insert_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: Some(hash_password(TEST_PASSWORD).expect("Failed to hash")),
                is_admin,
                profile_image: None,
            })
            .await
            .expect("Failed to create test user");
        let token = generate_access_token(&self.config, user.id);
        (user.id, token)
    }

    /// Create a club as `admin_token` and return its ID.
    pub async fn create_club(&self, admin_token: &str, name: &str) -> Uuid {
        let resp = self
            .send(
                Method::POST,
                "/api/admin/clubs",
                Some(admin_token),
                Some(serde_json::json!({ "name": name, "description": "A club" })),
            )
            .await;
        assert_eq!(resp.status(), 201, "club creation should succeed");
        id_of(&body_to_json(resp).await)
    }
}

/// Generate an access token for the given user.
pub fn generate_access_token(config: &Config, user_id: Uuid) -> String {
    let pair = jwt::generate_token_pair(
        user_id,
        &config.jwt_secret,
        config.jwt_access_expiry,
        config.jwt_refresh_expiry,
    )
    .expect("Failed to generate token pair");
    pair.access_token
}

/// Collect a response body and parse it as JSON.
pub async fn body_to_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}

/// Extract the `id` field of a JSON object as a UUID.
pub fn id_of(json: &Value) -> Uuid {
    json["id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("response has no id: {json}"))
}
