use axum::{Router, routing::get};

use super::controller::{create_post, get_post, list_posts};
use crate::state::AppState;

pub fn init_posts_router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/post/{post_id}", get(get_post))
}
