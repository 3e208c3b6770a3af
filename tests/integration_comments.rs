mod common;

use std::sync::Arc;

use agora::modules::comments::model::{Comment, NewComment};
use agora::modules::comments::service::CommentStore;
use agora::router::init_router;
use agora::state::AppState;
use agora::testing::TestContext;
use agora_db::StoreError;
use async_trait::async_trait;
use axum::Router;
use axum::http::StatusCode;
use chrono::DateTime;
use common::{assert_problem, get_request, json_request, register_and_login, send, setup_test_app};
use serde_json::json;
use uuid::Uuid;

async fn create_post(app: &Router, token: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/posts",
            Some(token),
            json!({ "title": "Hello", "content": "First post" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_comment() {
    let (app, ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;
    let author = ctx.state.tokens.verify(&token).unwrap();
    let post_id = create_post(&app, &token).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/post/{}/comments", post_id),
            Some(&token),
            json!({ "title": "Re: Hello", "content": "Nice post" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["post_id"], post_id);
    assert_eq!(body["author_id"], author.id.to_string());
    assert_eq!(body["title"], "Re: Hello");
    assert!(DateTime::parse_from_rfc3339(body["created_at"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_create_comment_ignores_client_ids() {
    let (app, ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;
    let author = ctx.state.tokens.verify(&token).unwrap();
    let post_id = create_post(&app, &token).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/post/{}/comments", post_id),
            Some(&token),
            json!({
                "title": "Re: Hello",
                "content": "Nice post",
                "author_id": Uuid::new_v4(),
                "post_id": Uuid::new_v4(),
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let stored = ctx.comments.comments();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].author_id, author.id);
    assert_eq!(stored[0].post_id.to_string(), post_id);
}

#[tokio::test]
async fn test_empty_comment_never_reaches_store() {
    let (app, ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;
    let post_id = create_post(&app, &token).await;
    let post_calls = ctx.posts.calls();

    for body in [
        json!({ "title": "", "content": "Nice post" }),
        json!({ "title": "Re: Hello", "content": "" }),
    ] {
        let (status, problem) = send(
            &app,
            json_request(
                "POST",
                &format!("/api/post/{}/comments", post_id),
                Some(&token),
                body,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_problem(&problem, StatusCode::BAD_REQUEST, "Validation Problem");
    }

    assert_eq!(ctx.comments.calls(), 0);
    assert_eq!(ctx.posts.calls(), post_calls);
}

#[tokio::test]
async fn test_comment_on_missing_post() {
    let (app, ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/post/{}/comments", Uuid::new_v4()),
            Some(&token),
            json!({ "title": "Re: ?", "content": "Anyone?" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_problem(&body, StatusCode::NOT_FOUND, "Not Found");
    assert_eq!(ctx.comments.calls(), 0);
}

#[tokio::test]
async fn test_list_and_get_comments() {
    let (app, _ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;
    let first_post = create_post(&app, &token).await;
    let second_post = create_post(&app, &token).await;

    let mut comment_ids = Vec::new();
    for post_id in [&first_post, &first_post, &second_post] {
        let (_, body) = send(
            &app,
            json_request(
                "POST",
                &format!("/api/post/{}/comments", post_id),
                Some(&token),
                json!({ "title": "Re", "content": "Reply" }),
            ),
        )
        .await;
        comment_ids.push(body["id"].as_str().unwrap().to_string());
    }

    let (status, body) = send(&app, get_request("/api/comments", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = send(
        &app,
        get_request(&format!("/api/post/{}/comments", first_post), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comments = body.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert!(comments.iter().all(|c| c["post_id"] == first_post.as_str()));

    let (status, body) = send(
        &app,
        get_request(&format!("/api/comment/{}", comment_ids[2]), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post_id"], second_post);
}

#[tokio::test]
async fn test_get_unknown_comment() {
    let (app, _ctx) = setup_test_app();
    let token = register_and_login(&app, "alice", "secret1").await;

    let (status, body) = send(
        &app,
        get_request(&format!("/api/comment/{}", Uuid::new_v4()), Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_problem(&body, StatusCode::NOT_FOUND, "Not Found");
}

struct PanickingCommentStore;

#[async_trait]
impl CommentStore for PanickingCommentStore {
    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        panic!("comment store exploded")
    }

    async fn list_post_comments(&self, _post_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        panic!("comment store exploded")
    }

    async fn create_comment(&self, _comment: NewComment) -> Result<Comment, StoreError> {
        panic!("comment store exploded")
    }

    async fn get_comment(&self, _id: Uuid) -> Result<Comment, StoreError> {
        panic!("comment store exploded")
    }
}

#[tokio::test]
async fn test_panicking_handler_returns_problem() {
    let ctx = TestContext::new();
    let state = AppState {
        comments: Arc::new(PanickingCommentStore),
        ..ctx.state.clone()
    };
    let app = init_router(state);
    let token = ctx.token_for(Uuid::new_v4(), "alice", "USER");

    let (status, body) = send(&app, get_request("/api/comments", Some(&token))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_problem(&body, StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
    assert_eq!(body["detail"], "Internal server error");

    // the server keeps serving after a panic
    let (status, _) = send(&app, get_request("/api/posts", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
}
