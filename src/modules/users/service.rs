use agora_db::{PgPool, StoreError};
use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use super::model::User;

const TABLE: &str = "users";

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. A taken name yields [`StoreError::DuplicateKey`].
    async fn create_user(&self, name: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<User, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self, password_hash))]
    async fn create_user(&self, name: &str, password_hash: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, password)
             VALUES ($1, $2)
             RETURNING id, name, password, created_at",
        )
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(TABLE, e))
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, password, created_at FROM users WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(TABLE, e))
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: Uuid) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>("SELECT id, name, password, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx_with_key(TABLE, "id", id, e))
    }
}
