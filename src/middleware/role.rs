//! Role-based authorization.
//!
//! Roles are plain strings compared exactly. A caller is admitted when its
//! role equals any of the allowed ones.

use agora_core::AppError;
use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::middleware::auth::AuthUser;

pub mod roles {
    pub const USER: &str = "USER";
    pub const ADMIN: &str = "ADMIN";
}

/// Runs `next` only when the authenticated caller holds one of `allowed_roles`.
///
/// Must be layered inside [`authenticate`](crate::middleware::auth::authenticate):
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/admin", get(handler))
///     .route_layer(middleware::from_fn(|req, next| {
///         require_roles(req, next, &[roles::ADMIN])
///     }))
///     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
/// ```
pub async fn require_roles(
    req: Request,
    next: Next,
    allowed_roles: &'static [&'static str],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let auth_user = AuthUser::from_request_parts(&mut parts, &()).await?;

    check_any_role(&auth_user, allowed_roles)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Admits callers holding the `USER` role.
pub async fn require_user(req: Request, next: Next) -> Response {
    match require_roles(req, next, &[roles::USER]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[&str]) -> Result<(), AppError> {
    if allowed_roles.iter().any(|role| auth_user.0.has_role(role)) {
        return Ok(());
    }

    warn!(
        user_id = %auth_user.id(),
        role = auth_user.role(),
        allowed = ?allowed_roles,
        "Caller lacks a required role"
    );
    Err(AppError::forbidden(anyhow!(
        "Make sure you have the right permissions"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_auth::Identity;
    use uuid::Uuid;

    fn user_with_role(role: &str) -> AuthUser {
        AuthUser(Identity {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            role: role.to_string(),
        })
    }

    #[test]
    fn test_check_any_role_matches() {
        let user = user_with_role(roles::USER);
        assert!(check_any_role(&user, &[roles::USER]).is_ok());
        assert!(check_any_role(&user, &[roles::ADMIN, roles::USER]).is_ok());
    }

    #[test]
    fn test_check_any_role_rejects() {
        let user = user_with_role(roles::USER);
        let err = check_any_role(&user, &[roles::ADMIN]).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }

    #[test]
    fn test_check_any_role_is_case_sensitive() {
        let user = user_with_role("user");
        assert!(check_any_role(&user, &[roles::USER]).is_err());
    }

    #[test]
    fn test_empty_role_set_rejects_everyone() {
        let user = user_with_role(roles::USER);
        assert!(check_any_role(&user, &[]).is_err());
    }
}
