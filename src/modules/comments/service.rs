use agora_core::AppError;
use agora_db::{PgPool, StoreError};
use async_trait::async_trait;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::model::{Comment, CreateCommentRequest, NewComment};
use crate::middleware::auth::AuthUser;
use crate::modules::posts::service::PostStore;

const TABLE: &str = "comments";

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError>;

    async fn list_post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError>;

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError>;

    async fn get_comment(&self, id: Uuid) -> Result<Comment, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgCommentStore {
    pool: PgPool,
}

impl PgCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    #[instrument(skip(self))]
    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, author_id, title, content, created_at
             FROM comments ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(TABLE, e))
    }

    #[instrument(skip(self))]
    async fn list_post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, author_id, title, content, created_at
             FROM comments WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(TABLE, e))
    }

    #[instrument(skip(self))]
    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, author_id, title, content)
             VALUES ($1, $2, $3, $4)
             RETURNING id, post_id, author_id, title, content, created_at",
        )
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.title)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(TABLE, e))
    }

    #[instrument(skip(self))]
    async fn get_comment(&self, id: Uuid) -> Result<Comment, StoreError> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, author_id, title, content, created_at
             FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx_with_key(TABLE, "id", id, e))
    }
}

pub struct CommentService;

impl CommentService {
    /// Comments on a missing post are answered with 404 before anything is written.
    #[instrument(skip_all, fields(post_id = %post_id, author_id = %author.id()))]
    pub async fn create_comment(
        posts: &dyn PostStore,
        comments: &dyn CommentStore,
        post_id: Uuid,
        author: &AuthUser,
        dto: CreateCommentRequest,
    ) -> Result<Comment, AppError> {
        if let Some(claimed) = dto.author_id.filter(|claimed| *claimed != author.id()) {
            warn!(claimed_author_id = %claimed, "Ignoring client supplied author id");
        }
        if let Some(claimed) = dto.post_id.filter(|claimed| *claimed != post_id) {
            warn!(claimed_post_id = %claimed, "Ignoring client supplied post id");
        }

        posts.get_post(post_id).await?;

        let comment = comments
            .create_comment(NewComment {
                post_id,
                author_id: author.id(),
                title: dto.title,
                content: dto.content,
            })
            .await?;

        info!(comment_id = %comment.id, "Created comment");
        Ok(comment)
    }
}
