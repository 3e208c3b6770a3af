use agora_core::{AppError, Problem};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use super::model::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use super::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Validation problem", body = Problem),
        (status = 409, description = "Username already taken", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user = AuthService::register_user(state.users.as_ref(), state.password_cost, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive a session token
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation problem", body = Problem),
        (status = 401, description = "Invalid username or password", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(
        state.users.as_ref(),
        &state.tokens,
        state.password_cost,
        dto,
    )
    .await?;
    Ok(Json(response))
}
