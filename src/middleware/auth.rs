use agora_auth::Identity;
use agora_core::AppError;
use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::error;
use uuid::Uuid;

use crate::state::AppState;

/// The verified caller, placed in the request extensions by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }

    pub fn role(&self) -> &str {
        &self.0.role
    }
}

/// Rejects the request with 401 unless it carries a valid token.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized(anyhow!("Authorization header required")))?;

    let identity = state.tokens.verify(token)?;

    req.extensions_mut().insert(AuthUser(identity));
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            error!("No authenticated user on the request, is the route behind `authenticate`?");
            AppError::unauthorized(anyhow!("Unauthorized"))
        })
    }
}
