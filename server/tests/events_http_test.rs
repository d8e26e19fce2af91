//! HTTP Integration Tests for Events
//!
//! Read gating via `EVENTS_REQUIRE_AUTH_TO_READ`, admin-only writes, and the
//! follow toggle.
//!
//! Run with: `cargo test --test events_http_test -- --nocapture`

mod helpers;

use axum::http::Method;
use clubhub_server::config::Config;
use helpers::{body_to_json, id_of, TestApp};
use serde_json::json;

async fn create_event(app: &TestApp, admin: &str, title: &str, date: &str) -> uuid::Uuid {
    let resp = app
        .send(
            Method::POST,
            "/api/events",
            Some(admin),
            Some(json!({ "title": title, "description": "See you there", "date": date })),
        )
        .await;
    assert_eq!(resp.status(), 201, "event creation should succeed");
    id_of(&body_to_json(resp).await)
}

#[tokio::test]
async fn test_anonymous_read_requires_auth_by_default() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;
    let event_id = create_event(&app, &admin, "Open day", "2026-11-01T10:00:00Z").await;

    let resp = app.send(Method::GET, "/api/events", None, None).await;
    assert_eq!(resp.status(), 401);

    let resp = app
        .send(Method::GET, &format!("/api/events/{event_id}"), None, None)
        .await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_anonymous_read_allowed_when_configured() {
    let config = Config {
        events_require_auth_to_read: false,
        ..Config::default_for_test()
    };
    let app = TestApp::with_config(config);
    let (_, admin) = app.create_admin("admin").await;
    create_event(&app, &admin, "Open day", "2026-11-01T10:00:00Z").await;

    let resp = app.send(Method::GET, "/api/events", None, None).await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json[0]["title"], "Open day");
    assert_eq!(json[0]["created_by"], "admin");
    assert_eq!(json[0]["is_followed"], false);
}

#[tokio::test]
async fn test_only_admin_writes_events() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;
    let (_, user) = app.create_user("alice").await;
    let event_id = create_event(&app, &admin, "Open day", "2026-11-01T10:00:00Z").await;
    let uri = format!("/api/events/{event_id}");

    let resp = app
        .send(
            Method::POST,
            "/api/events",
            Some(&user),
            Some(json!({ "title": "Mine", "description": "x", "date": "2026-11-02T10:00:00Z" })),
        )
        .await;
    assert_eq!(resp.status(), 403);

    let resp = app
        .send(Method::PATCH, &uri, Some(&user), Some(json!({ "title": "Mine" })))
        .await;
    assert_eq!(resp.status(), 403);

    let resp = app.send(Method::DELETE, &uri, Some(&user), None).await;
    assert_eq!(resp.status(), 403);

    let resp = app
        .send(Method::PATCH, &uri, Some(&admin), Some(json!({ "title": "Closed day" })))
        .await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json["title"], "Closed day");
    assert_eq!(json["description"], "See you there");

    let resp = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(resp.status(), 204);

    let resp = app.send(Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_toggle_follow_and_followed_events() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;
    let (_, user) = app.create_user("alice").await;
    let later = create_event(&app, &admin, "Later", "2026-12-01T10:00:00Z").await;
    let sooner = create_event(&app, &admin, "Sooner", "2026-11-01T10:00:00Z").await;

    for id in [later, sooner] {
        let resp = app
            .send(Method::POST, &format!("/api/events/{id}/toggle-follow"), Some(&user), None)
            .await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_to_json(resp).await, json!({ "followed": true }));
    }

    let resp = app
        .send(Method::GET, "/api/me/followed-events", Some(&user), None)
        .await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert!(json.as_array().unwrap().iter().all(|e| e["is_followed"] == true));

    let resp = app
        .send(
            Method::POST,
            &format!("/api/events/{later}/toggle-follow"),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(body_to_json(resp).await, json!({ "followed": false }));

    let json = body_to_json(
        app.send(Method::GET, "/api/me/followed-events", Some(&user), None)
            .await,
    )
    .await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], sooner.to_string());
    assert_eq!(json[0]["followers_count"], 1);
}

#[tokio::test]
async fn test_anonymous_cannot_follow_event() {
    let config = Config {
        events_require_auth_to_read: false,
        ..Config::default_for_test()
    };
    let app = TestApp::with_config(config);
    let (_, admin) = app.create_admin("admin").await;
    let event_id = create_event(&app, &admin, "Open day", "2026-11-01T10:00:00Z").await;

    let resp = app
        .send(
            Method::POST,
            &format!("/api/events/{event_id}/toggle-follow"),
            None,
            None,
        )
        .await;
    assert_eq!(resp.status(), 401);
}
