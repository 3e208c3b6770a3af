use agora_auth::TokenService;
use agora_core::{AppError, hash_password, verify_password};
use agora_db::StoreError;
use anyhow::anyhow;
use tracing::{info, instrument, warn};

use super::model::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::middleware::role::roles;
use crate::modules::users::service::UserStore;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip_all, fields(username = %dto.username))]
    pub async fn register_user(
        users: &dyn UserStore,
        password_cost: u32,
        dto: RegisterRequest,
    ) -> Result<RegisterResponse, AppError> {
        if users.find_by_name(&dto.username).await?.is_some() {
            warn!("Username already taken");
            return Err(AppError::conflict(anyhow!("User already exists")));
        }

        let password_hash = hash_password(&dto.password, password_cost)?;

        let user = match users.create_user(&dto.username, &password_hash).await {
            Ok(user) => user,
            // lost a race with a concurrent registration
            Err(StoreError::DuplicateKey { .. }) => {
                warn!("Username already taken");
                return Err(AppError::conflict(anyhow!("User already exists")));
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user.id, "Registered user");
        Ok(RegisterResponse {
            id: user.id,
            username: user.name,
        })
    }

    /// Unknown users and wrong passwords fail identically, in both detail and bcrypt work.
    #[instrument(skip_all, fields(username = %dto.username))]
    pub async fn login_user(
        users: &dyn UserStore,
        tokens: &TokenService,
        password_cost: u32,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) = users.find_by_name(&dto.username).await? else {
            hash_password(&dto.password, password_cost)?;
            warn!("Login attempt for unknown user");
            return Err(AppError::unauthorized(anyhow!(INVALID_CREDENTIALS)));
        };

        if !verify_password(&dto.password, &user.password)? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::unauthorized(anyhow!(INVALID_CREDENTIALS)));
        }

        let token = tokens.issue(user.id, &user.name, roles::USER)?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse { token })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::testing::{InMemoryUserStore, test_jwt_config};

    const COST: u32 = 8;

    async fn timed_login(users: &InMemoryUserStore, tokens: &TokenService, username: &str) -> Duration {
        let dto = LoginRequest {
            username: username.to_string(),
            password: "wrong-password".to_string(),
        };
        let start = Instant::now();
        let err = AuthService::login_user(users, tokens, COST, dto).await.unwrap_err();
        let elapsed = start.elapsed();

        assert_eq!(err.status.as_u16(), 401);
        assert_eq!(err.problem().detail, INVALID_CREDENTIALS);
        elapsed
    }

    #[tokio::test]
    async fn test_unknown_user_costs_as_much_as_wrong_password() {
        let users = InMemoryUserStore::default();
        let tokens = TokenService::new(&test_jwt_config());
        let hashed = hash_password("secret1", COST).unwrap();
        users.create_user("alice", &hashed).await.unwrap();

        let mut known = Duration::MAX;
        let mut unknown = Duration::MAX;
        for _ in 0..3 {
            known = known.min(timed_login(&users, &tokens, "alice").await);
            unknown = unknown.min(timed_login(&users, &tokens, "mallory").await);
        }

        assert!(
            unknown * 2 >= known,
            "unknown user answered in {:?}, known user in {:?}",
            unknown,
            known
        );
    }
}
