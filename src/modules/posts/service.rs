use agora_core::AppError;
use agora_db::{PgPool, StoreError};
use async_trait::async_trait;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::model::{CreatePostRequest, NewPost, Post};
use crate::middleware::auth::AuthUser;

const TABLE: &str = "posts";

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, StoreError>;

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError>;

    async fn get_post(&self, id: Uuid) -> Result<Post, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    #[instrument(skip(self))]
    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        sqlx::query_as::<_, Post>(
            "SELECT id, author_id, title, content, create_at FROM posts ORDER BY create_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(TABLE, e))
    }

    #[instrument(skip(self))]
    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (author_id, title, content)
             VALUES ($1, $2, $3)
             RETURNING id, author_id, title, content, create_at",
        )
        .bind(post.author_id)
        .bind(&post.title)
        .bind(&post.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(TABLE, e))
    }

    #[instrument(skip(self))]
    async fn get_post(&self, id: Uuid) -> Result<Post, StoreError> {
        sqlx::query_as::<_, Post>(
            "SELECT id, author_id, title, content, create_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx_with_key(TABLE, "id", id, e))
    }
}

pub struct PostService;

impl PostService {
    #[instrument(skip_all, fields(author_id = %author.id()))]
    pub async fn create_post(
        posts: &dyn PostStore,
        author: &AuthUser,
        dto: CreatePostRequest,
    ) -> Result<Post, AppError> {
        if let Some(claimed) = dto.author_id.filter(|claimed| *claimed != author.id()) {
            warn!(claimed_author_id = %claimed, "Ignoring client supplied author id");
        }

        let post = posts
            .create_post(NewPost {
                author_id: author.id(),
                title: dto.title,
                content: dto.content,
            })
            .await?;

        info!(post_id = %post.id, "Created post");
        Ok(post)
    }
}
