use agora_core::{AppError, Problem};
use axum::Json;
use axum::extract::State;
use tracing::instrument;

use super::model::UserProfile;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Get the authenticated user's profile
#[utoipa::path(
    post,
    path = "/api/user",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = Problem),
        (status = 404, description = "User no longer exists", body = Problem),
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let user = state.users.get_user(auth_user.id()).await?;

    Ok(Json(UserProfile {
        id: user.id,
        username: user.name,
        role: auth_user.role().to_string(),
    }))
}
