mod common;

use agora::middleware::role::roles;
use agora::testing::test_jwt_config;
use agora_auth::TokenService;
use agora_config::JwtConfig;
use axum::http::StatusCode;
use chrono::DateTime;
use common::{assert_problem, get_request, json_request, register_and_login, send, setup_test_app};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_post() {
    let (app, ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;
    let author = ctx.state.tokens.verify(&token).unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/posts",
            Some(&token),
            json!({ "title": "Hello", "content": "First post" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Hello");
    assert_eq!(body["content"], "First post");
    assert_eq!(body["author_id"], author.id.to_string());
    assert!(DateTime::parse_from_rfc3339(body["create_at"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_create_post_ignores_client_author() {
    let (app, ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;
    let author = ctx.state.tokens.verify(&token).unwrap();
    let impostor = Uuid::new_v4();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/posts",
            Some(&token),
            json!({ "title": "Hello", "content": "First post", "author_id": impostor }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author_id"], author.id.to_string());
    assert_eq!(ctx.posts.posts()[0].author_id, author.id);
}

#[tokio::test]
async fn test_create_post_empty_title_never_reaches_store() {
    let (app, ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/posts",
            Some(&token),
            json!({ "title": "", "content": "First post" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&body, StatusCode::BAD_REQUEST, "Validation Problem");
    assert_eq!(ctx.posts.calls(), 0);
}

#[tokio::test]
async fn test_list_and_get_posts() {
    let (app, _ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;

    let mut ids = Vec::new();
    for title in ["first", "second"] {
        let (_, body) = send(
            &app,
            json_request(
                "POST",
                "/api/posts",
                Some(&token),
                json!({ "title": title, "content": "body" }),
            ),
        )
        .await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    let (status, body) = send(&app, get_request("/api/posts", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(&app, get_request(&format!("/api/post/{}", ids[1]), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "second");
}

#[tokio::test]
async fn test_get_unknown_post() {
    let (app, _ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;

    let (status, body) = send(
        &app,
        get_request(&format!("/api/post/{}", Uuid::new_v4()), Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_problem(&body, StatusCode::NOT_FOUND, "Not Found");
}

#[tokio::test]
async fn test_get_post_malformed_id() {
    let (app, ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;

    let (status, body) = send(&app, get_request("/api/post/not-a-uuid", Some(&token))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&body, StatusCode::BAD_REQUEST, "Validation Problem");
    assert_eq!(ctx.posts.calls(), 0);
}

#[tokio::test]
async fn test_posts_require_token() {
    let (app, ctx) = setup_test_app();

    let (status, _) = send(&app, get_request("/api/posts", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.posts.calls(), 0);
}

#[tokio::test]
async fn test_posts_forbid_other_roles() {
    let (app, ctx) = setup_test_app();
    let token = ctx.token_for(Uuid::new_v4(), "root", roles::ADMIN);

    let (status, body) = send(&app, get_request("/api/posts", Some(&token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_problem(&body, StatusCode::FORBIDDEN, "Forbidden");
    assert_eq!(ctx.posts.calls(), 0);
}

#[tokio::test]
async fn test_posts_reject_expired_token() {
    let (app, ctx) = setup_test_app();
    let expired = TokenService::new(&JwtConfig {
        token_ttl: -60,
        ..test_jwt_config()
    });
    let token = expired.issue(Uuid::new_v4(), "alice", roles::USER).unwrap();

    let (status, _) = send(&app, get_request("/api/posts", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.posts.calls(), 0);
}
