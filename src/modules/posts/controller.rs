use agora_core::{AppError, Problem, parse_uuid};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use super::model::{CreatePostRequest, Post};
use super::service::PostService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List all posts
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "All posts, newest first", body = Vec<Post>),
        (status = 401, description = "Missing or invalid token", body = Problem),
        (status = 403, description = "Caller lacks the USER role", body = Problem),
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    let posts = state.posts.list_posts().await?;
    Ok(Json(posts))
}

/// Create a post authored by the caller
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Validation problem", body = Problem),
        (status = 401, description = "Missing or invalid token", body = Problem),
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let post = PostService::create_post(state.posts.as_ref(), &auth_user, dto).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Get a post by id
#[utoipa::path(
    get,
    path = "/api/post/{post_id}",
    params(("post_id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "The post", body = Post),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "No such post", body = Problem),
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Post>, AppError> {
    let id = parse_uuid(&post_id)?;
    let post = state.posts.get_post(id).await?;
    Ok(Json(post))
}
