use axum::{Router, routing::get};

use super::controller::{create_comment, get_comment, list_comments, list_post_comments};
use crate::state::AppState;

pub fn init_comments_router() -> Router<AppState> {
    Router::new()
        .route("/comments", get(list_comments))
        .route(
            "/post/{post_id}/comments",
            get(list_post_comments).post(create_comment),
        )
        .route("/comment/{comment_id}", get(get_comment))
}
