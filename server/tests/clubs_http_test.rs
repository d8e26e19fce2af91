//! HTTP Integration Tests for Clubs and Club Posts
//!
//! Public browsing, follow/like toggles, admin-only writes, and cascades.
//!
//! Run with: `cargo test --test clubs_http_test -- --nocapture`

mod helpers;

use axum::http::Method;
use helpers::{body_to_json, id_of, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

// ============================================================================
// Public reads
// ============================================================================

#[tokio::test]
async fn test_anonymous_can_list_and_retrieve_clubs() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;
    let club_id = app.create_club(&admin, "Chess").await;

    let resp = app.send(Method::GET, "/api/clubs", None, None).await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Chess");
    assert_eq!(json[0]["followers_count"], 0);
    assert_eq!(json[0]["is_followed"], false);

    let resp = app
        .send(Method::GET, &format!("/api/clubs/{club_id}"), None, None)
        .await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json["id"], club_id.to_string());
    assert!(json["posts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_club_is_404() {
    let app = TestApp::new();
    let resp = app
        .send(Method::GET, &format!("/api/clubs/{}", Uuid::now_v7()), None, None)
        .await;
    assert_eq!(resp.status(), 404);
    assert_eq!(body_to_json(resp).await["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_token_is_treated_as_anonymous() {
    let app = TestApp::new();
    let resp = app
        .send(Method::GET, "/api/clubs", Some("not-a-jwt"), None)
        .await;
    assert_eq!(resp.status(), 200);
}

// ============================================================================
// Follow toggle
// ============================================================================

#[tokio::test]
async fn test_follow_toggle_scenario() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;
    let (_, user) = app.create_user("alice").await;
    let club_id = app.create_club(&admin, "Chess").await;
    let follow = format!("/api/clubs/{club_id}/follow");
    let detail = format!("/api/clubs/{club_id}");

    let resp = app.send(Method::POST, &follow, Some(&user), None).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(body_to_json(resp).await, json!({ "followed": true }));

    let json = body_to_json(app.send(Method::GET, &detail, Some(&user), None).await).await;
    assert_eq!(json["is_followed"], true);
    assert_eq!(json["followers_count"], 1);

    let resp = app.send(Method::POST, &follow, Some(&user), None).await;
    assert_eq!(body_to_json(resp).await, json!({ "followed": false }));

    let json = body_to_json(app.send(Method::GET, &detail, Some(&user), None).await).await;
    assert_eq!(json["is_followed"], false);
    assert_eq!(json["followers_count"], 0);
}

#[tokio::test]
async fn test_anonymous_cannot_follow_like_or_post() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;
    let club_id = app.create_club(&admin, "Chess").await;

    let resp = app
        .send(
            Method::POST,
            &format!("/api/clubs/{club_id}/posts"),
            Some(&admin),
            Some(json!({ "title": "Opening", "content": "Bring a board" })),
        )
        .await;
    let post_id = id_of(&body_to_json(resp).await);

    let resp = app
        .send(Method::POST, &format!("/api/clubs/{club_id}/follow"), None, None)
        .await;
    assert_eq!(resp.status(), 401);

    let resp = app
        .send(Method::POST, &format!("/api/posts/{post_id}/like"), None, None)
        .await;
    assert_eq!(resp.status(), 401);

    let resp = app
        .send(
            Method::POST,
            &format!("/api/clubs/{club_id}/posts"),
            None,
            Some(json!({ "title": "Spam", "content": "..." })),
        )
        .await;
    assert_eq!(resp.status(), 401);
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn test_post_owner_is_stamped_server_side() {
    let app = TestApp::new();
    let (admin_id, admin) = app.create_admin("admin").await;
    let (user_id, _) = app.create_user("alice").await;
    let club_id = app.create_club(&admin, "Chess").await;

    let resp = app
        .send(
            Method::POST,
            &format!("/api/clubs/{club_id}/posts"),
            Some(&admin),
            Some(json!({
                "title": "Opening",
                "content": "Bring a board",
                "created_by": user_id,
            })),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let json = body_to_json(resp).await;
    assert_eq!(json["created_by"], admin_id.to_string());
    assert_eq!(json["author_username"], "admin");
    assert_eq!(json["club"], club_id.to_string());
    assert_eq!(json["is_public"], true);
}

#[tokio::test]
async fn test_like_toggle_and_liked_posts() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;
    let (_, user) = app.create_user("alice").await;
    let club_id = app.create_club(&admin, "Chess").await;

    let resp = app
        .send(
            Method::POST,
            &format!("/api/clubs/{club_id}/posts"),
            Some(&admin),
            Some(json!({ "title": "Opening", "content": "Bring a board" })),
        )
        .await;
    let post_id = id_of(&body_to_json(resp).await);
    let like = format!("/api/posts/{post_id}/like");

    let resp = app.send(Method::POST, &like, Some(&user), None).await;
    assert_eq!(body_to_json(resp).await, json!({ "liked": true }));

    let resp = app
        .send(Method::GET, "/api/me/liked-posts", Some(&user), None)
        .await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json[0]["id"], post_id.to_string());
    assert_eq!(json[0]["likes_count"], 1);
    assert_eq!(json[0]["is_liked"], true);

    let resp = app.send(Method::POST, &like, Some(&user), None).await;
    assert_eq!(body_to_json(resp).await, json!({ "liked": false }));

    let resp = app
        .send(Method::GET, "/api/me/liked-posts", None, None)
        .await;
    assert_eq!(resp.status(), 401);
}

// ============================================================================
// Admin authorization
// ============================================================================

/// Every admin-only club and post route, as `(method, uri, body)`.
async fn admin_club_routes(app: &TestApp, admin: &str) -> Vec<(Method, String, Option<Value>)> {
    let club_id = app.create_club(admin, "Chess").await;
    let resp = app
        .send(
            Method::POST,
            &format!("/api/clubs/{club_id}/posts"),
            Some(admin),
            Some(json!({ "title": "Opening", "content": "Bring a board" })),
        )
        .await;
    let post_id = id_of(&body_to_json(resp).await);

    vec![
        (Method::GET, "/api/admin/clubs".to_string(), None),
        (Method::POST, "/api/admin/clubs".to_string(), Some(json!({ "name": "Go", "description": "x" }))),
        (Method::GET, format!("/api/admin/clubs/{club_id}"), None),
        (Method::PATCH, format!("/api/admin/clubs/{club_id}"), Some(json!({ "name": "Mine" }))),
        (Method::DELETE, format!("/api/admin/clubs/{club_id}"), None),
        (
            Method::POST,
            format!("/api/clubs/{club_id}/posts"),
            Some(json!({ "title": "Mine", "content": "x" })),
        ),
        (Method::GET, format!("/api/admin/posts/{post_id}"), None),
        (Method::PATCH, format!("/api/admin/posts/{post_id}"), Some(json!({ "title": "Mine" }))),
        (Method::DELETE, format!("/api/admin/posts/{post_id}"), None),
    ]
}

#[tokio::test]
async fn test_non_admin_cannot_write() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;
    let (_, user) = app.create_user("alice").await;

    for (method, uri, body) in admin_club_routes(&app, &admin).await {
        let resp = app.send(method.clone(), &uri, Some(&user), body).await;
        assert_eq!(resp.status(), 403, "{method} {uri} should be forbidden");
        assert_eq!(body_to_json(resp).await["error"], "FORBIDDEN");
    }

    // Nothing was touched
    let resp = app.send(Method::GET, "/api/clubs", None, None).await;
    let json = body_to_json(resp).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Chess");
}

#[tokio::test]
async fn test_anonymous_admin_routes_are_401() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;

    for (method, uri, body) in admin_club_routes(&app, &admin).await {
        let resp = app.send(method.clone(), &uri, None, body).await;
        assert_eq!(resp.status(), 401, "{method} {uri} should need credentials");
        assert_eq!(body_to_json(resp).await["error"], "UNAUTHORIZED");
    }
}

// ============================================================================
// Admin management
// ============================================================================

#[tokio::test]
async fn test_duplicate_club_name_is_409() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;
    app.create_club(&admin, "Chess").await;

    let resp = app
        .send(
            Method::POST,
            "/api/admin/clubs",
            Some(&admin),
            Some(json!({ "name": "Chess", "description": "Again" })),
        )
        .await;
    assert_eq!(resp.status(), 409);
    assert_eq!(body_to_json(resp).await["error"], "CONFLICT");
}

#[tokio::test]
async fn test_empty_club_name_is_400() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;

    let resp = app
        .send(
            Method::POST,
            "/api/admin/clubs",
            Some(&admin),
            Some(json!({ "name": "", "description": "Nameless" })),
        )
        .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_to_json(resp).await["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_admin_club_shape_and_partial_update() {
    let app = TestApp::new();
    let (admin_id, admin) = app.create_admin("admin").await;
    let club_id = app.create_club(&admin, "Chess").await;
    let uri = format!("/api/admin/clubs/{club_id}");

    let json = body_to_json(app.send(Method::GET, &uri, Some(&admin), None).await).await;
    assert_eq!(json["created_by"], admin_id.to_string());
    assert_eq!(json["created_by_username"], "admin");
    assert!(json["created_at"].is_string());
    assert!(json["updated_at"].is_string());

    let resp = app
        .send(
            Method::PUT,
            &uri,
            Some(&admin),
            Some(json!({ "description": "Blitz on Fridays" })),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json["name"], "Chess");
    assert_eq!(json["description"], "Blitz on Fridays");
}

#[tokio::test]
async fn test_delete_club_cascades_to_posts() {
    let app = TestApp::new();
    let (_, admin) = app.create_admin("admin").await;
    let club_id = app.create_club(&admin, "Chess").await;

    let resp = app
        .send(
            Method::POST,
            &format!("/api/clubs/{club_id}/posts"),
            Some(&admin),
            Some(json!({ "title": "Opening", "content": "Bring a board" })),
        )
        .await;
    let post_id = id_of(&body_to_json(resp).await);

    let resp = app
        .send(Method::DELETE, &format!("/api/admin/clubs/{club_id}"), Some(&admin), None)
        .await;
    assert_eq!(resp.status(), 204);

    let resp = app
        .send(Method::GET, &format!("/api/admin/posts/{post_id}"), Some(&admin), None)
        .await;
    assert_eq!(resp.status(), 404);

    let resp = app
        .send(Method::GET, &format!("/api/clubs/{club_id}/posts"), None, None)
        .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_media_references_resolve_to_urls() {
    let mut config = clubhub_server::config::Config::default_for_test();
    config.media_base_url = Some("https://cdn.example.com/media".to_string());
    let app = TestApp::with_config(config);
    let (_, admin) = app.create_admin("admin").await;

    let resp = app
        .send(
            Method::POST,
            "/api/admin/clubs",
            Some(&admin),
            Some(json!({ "name": "Chess", "description": "x", "image": "clubs/chess.png" })),
        )
        .await;
    let json = body_to_json(resp).await;
    assert_eq!(json["image"], "https://cdn.example.com/media/clubs/chess.png");
}
