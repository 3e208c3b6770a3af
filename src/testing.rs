//! In-memory stores and a ready-made [`AppState`] for tests.
//!
//! Each store counts the calls it receives so tests can assert that a
//! rejected request never reached persistence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use agora_auth::TokenService;
use agora_config::JwtConfig;
use agora_db::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::modules::comments::model::{Comment, NewComment};
use crate::modules::comments::service::CommentStore;
use crate::modules::posts::model::{NewPost, Post};
use crate::modules::posts::service::PostStore;
use crate::modules::users::model::User;
use crate::modules::users::service::UserStore;
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";

/// bcrypt's minimum cost, so tests hash quickly.
pub const TEST_PASSWORD_COST: u32 = 4;

fn lock<T>(mutex: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        token_ttl: 3600,
        issuer: "agora".to_string(),
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    calls: AtomicUsize,
}

impl InMemoryUserStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        lock(&self.users).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, name: &str, password_hash: &str) -> Result<User, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut users = lock(&self.users);
        if users.iter().any(|user| user.name == name) {
            return Err(StoreError::DuplicateKey {
                table: "users",
                detail: format!("name {} is taken", name),
            });
        }

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            password: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.users).iter().find(|user| user.name == name).cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<User, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.users)
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("users", "id", id))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    posts: Mutex<Vec<Post>>,
    calls: AtomicUsize,
}

impl InMemoryPostStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn posts(&self) -> Vec<Post> {
        lock(&self.posts).clone()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut posts = lock(&self.posts).clone();
        posts.reverse();
        Ok(posts)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let post = Post {
            id: Uuid::new_v4(),
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            create_at: Utc::now(),
        };
        lock(&self.posts).push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: Uuid) -> Result<Post, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.posts)
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("posts", "id", id))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    comments: Mutex<Vec<Comment>>,
    calls: AtomicUsize,
}

impl InMemoryCommentStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn comments(&self) -> Vec<Comment> {
        lock(&self.comments).clone()
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.comments).clone())
    }

    async fn list_post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.comments)
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            title: comment.title,
            content: comment.content,
            created_at: Utc::now(),
        };
        lock(&self.comments).push(comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, id: Uuid) -> Result<Comment, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.comments)
            .iter()
            .find(|comment| comment.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("comments", "id", id))
    }
}

/// An [`AppState`] over fresh in-memory stores, with handles to inspect them.
#[derive(Clone)]
pub struct TestContext {
    pub state: AppState,
    pub users: Arc<InMemoryUserStore>,
    pub posts: Arc<InMemoryPostStore>,
    pub comments: Arc<InMemoryCommentStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserStore::default());
        let posts = Arc::new(InMemoryPostStore::default());
        let comments = Arc::new(InMemoryCommentStore::default());

        let state = AppState {
            tokens: Arc::new(TokenService::new(&test_jwt_config())),
            users: users.clone(),
            posts: posts.clone(),
            comments: comments.clone(),
            password_cost: TEST_PASSWORD_COST,
        };

        Self {
            state,
            users,
            posts,
            comments,
        }
    }

    /// Signs a token for an arbitrary identity without touching the user store.
    pub fn token_for(&self, id: Uuid, username: &str, role: &str) -> String {
        match self.state.tokens.issue(id, username, role) {
            Ok(token) => format!("Bearer {}", token),
            Err(e) => panic!("failed to sign test token: {}", e),
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
