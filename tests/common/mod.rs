#![allow(dead_code)]

use agora::router::init_router;
use agora::testing::TestContext;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub fn setup_test_app() -> (Router, TestContext) {
    let ctx = TestContext::new();
    (init_router(ctx.state.clone()), ctx)
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::empty()).unwrap()
}

/// Sends a request and returns the status with the decoded JSON body (`Null` when empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, body)
}

/// Registers a user through the API, logs in and returns an `Authorization` header value.
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let credentials = json!({ "username": username, "password": password });

    let (status, _) = send(app, json_request("POST", "/api/register", None, credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, json_request("POST", "/api/login", None, credentials)).await;
    assert_eq!(status, StatusCode::OK);

    format!("Bearer {}", body["token"].as_str().unwrap())
}

pub fn assert_problem(body: &Value, status: StatusCode, title: &str) {
    assert_eq!(body["status"], status.as_u16());
    assert_eq!(body["title"], title);
    assert_eq!(
        body["type"],
        format!(
            "https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/{}",
            status.as_u16()
        )
    );
}
