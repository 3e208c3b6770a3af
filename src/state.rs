use std::sync::Arc;

use agora_auth::TokenService;
use agora_config::AppConfig;
use agora_db::PgPool;

use crate::modules::comments::service::{CommentStore, PgCommentStore};
use crate::modules::posts::service::{PgPostStore, PostStore};
use crate::modules::users::service::{PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub comments: Arc<dyn CommentStore>,
    /// bcrypt cost for newly registered passwords
    pub password_cost: u32,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn new(config: &AppConfig, pool: PgPool) -> Self {
        Self {
            tokens: Arc::new(TokenService::new(&config.jwt())),
            users: Arc::new(PgUserStore::new(pool.clone())),
            posts: Arc::new(PgPostStore::new(pool.clone())),
            comments: Arc::new(PgCommentStore::new(pool)),
            password_cost: config.password_cost,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("password_cost", &self.password_cost)
            .finish_non_exhaustive()
    }
}
