use axum::{Router, routing::post};

use super::controller::get_current_user;
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new().route("/user", post(get_current_user))
}
