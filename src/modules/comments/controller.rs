use agora_core::{AppError, Problem, parse_uuid};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use super::model::{Comment, CreateCommentRequest};
use super::service::CommentService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List all comments
#[utoipa::path(
    get,
    path = "/api/comments",
    responses(
        (status = 200, description = "All comments", body = Vec<Comment>),
        (status = 401, description = "Missing or invalid token", body = Problem),
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_comments(State(state): State<AppState>) -> Result<Json<Vec<Comment>>, AppError> {
    let comments = state.comments.list_comments().await?;
    Ok(Json(comments))
}

/// List the comments of one post
#[utoipa::path(
    get,
    path = "/api/post/{post_id}/comments",
    params(("post_id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Comments of the post, oldest first", body = Vec<Comment>),
        (status = 400, description = "Malformed id", body = Problem),
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let post_id = parse_uuid(&post_id)?;
    let comments = state.comments.list_post_comments(post_id).await?;
    Ok(Json(comments))
}

/// Comment on a post as the caller
#[utoipa::path(
    post,
    path = "/api/post/{post_id}/comments",
    params(("post_id" = String, Path, description = "Post id")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Validation problem", body = Problem),
        (status = 404, description = "No such post", body = Problem),
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(post_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let post_id = parse_uuid(&post_id)?;
    let comment = CommentService::create_comment(
        state.posts.as_ref(),
        state.comments.as_ref(),
        post_id,
        &auth_user,
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Get a comment by id
#[utoipa::path(
    get,
    path = "/api/comment/{comment_id}",
    params(("comment_id" = String, Path, description = "Comment id")),
    responses(
        (status = 200, description = "The comment", body = Comment),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "No such comment", body = Problem),
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<Json<Comment>, AppError> {
    let id = parse_uuid(&comment_id)?;
    let comment = state.comments.get_comment(id).await?;
    Ok(Json(comment))
}
