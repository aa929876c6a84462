//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use board_api::{
    AppConfig, AppState, MemoryRepository,
    auth::{AuthUser, hash_password},
    models::{Comment, NewComment, NewPost, NewUser, Post, PostSummary, User},
    repository::{RepoResult, Repository, RepositoryError, RepositoryState},
};
use uuid::Uuid;

/// Lowest bcrypt cost the crate accepts; keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config() -> AppConfig {
    AppConfig {
        bcrypt_cost: TEST_BCRYPT_COST,
        ..AppConfig::default()
    }
}

pub fn state_with(repo: RepositoryState) -> AppState {
    AppState::new(repo, test_config())
}

pub fn memory_state() -> AppState {
    state_with(Arc::new(MemoryRepository::new()))
}

/// Stores a user with a real bcrypt hash and returns its identity.
pub async fn seed_user(repo: &RepositoryState, nickname: &str, password: &str) -> AuthUser {
    let user = repo
        .create_user(NewUser {
            nickname: nickname.to_string(),
            password_hash: hash_password(password, TEST_BCRYPT_COST).unwrap(),
        })
        .await
        .unwrap();
    AuthUser {
        id: user.id,
        nickname: user.nickname,
    }
}

// --- FailingRepo ---

/// Every operation fails as if the connection pool were exhausted.
pub struct FailingRepo;

fn pool_timeout() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl Repository for FailingRepo {
    async fn get_user(&self, _id: Uuid) -> RepoResult<Option<User>> {
        Err(pool_timeout())
    }
    async fn get_user_by_nickname(&self, _nickname: &str) -> RepoResult<Option<User>> {
        Err(pool_timeout())
    }
    async fn create_user(&self, _user: NewUser) -> RepoResult<User> {
        Err(pool_timeout())
    }
    async fn list_posts(&self) -> RepoResult<Vec<PostSummary>> {
        Err(pool_timeout())
    }
    async fn get_post(&self, _id: Uuid) -> RepoResult<Option<Post>> {
        Err(pool_timeout())
    }
    async fn create_post(&self, _post: NewPost) -> RepoResult<Post> {
        Err(pool_timeout())
    }
    async fn update_post(&self, _id: Uuid, _t: &str, _c: &str) -> RepoResult<Option<Post>> {
        Err(pool_timeout())
    }
    async fn delete_post(&self, _id: Uuid) -> RepoResult<bool> {
        Err(pool_timeout())
    }
    async fn list_comments(&self, _post_id: Uuid) -> RepoResult<Vec<Comment>> {
        Err(pool_timeout())
    }
    async fn get_comment(&self, _id: Uuid) -> RepoResult<Option<Comment>> {
        Err(pool_timeout())
    }
    async fn create_comment(&self, _comment: NewComment) -> RepoResult<Comment> {
        Err(pool_timeout())
    }
    async fn update_comment(&self, _id: Uuid, _content: &str) -> RepoResult<Option<Comment>> {
        Err(pool_timeout())
    }
    async fn delete_comment(&self, _id: Uuid) -> RepoResult<bool> {
        Err(pool_timeout())
    }
}

// --- CountingRepo ---

/// A `MemoryRepository` that counts every call made to it.
#[derive(Default)]
pub struct CountingRepo {
    inner: MemoryRepository,
    calls: AtomicUsize,
}

impl CountingRepo {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) -> &MemoryRepository {
        self.calls.fetch_add(1, Ordering::SeqCst);
        &self.inner
    }
}

#[async_trait]
impl Repository for CountingRepo {
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        self.hit().get_user(id).await
    }
    async fn get_user_by_nickname(&self, nickname: &str) -> RepoResult<Option<User>> {
        self.hit().get_user_by_nickname(nickname).await
    }
    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        self.hit().create_user(user).await
    }
    async fn list_posts(&self) -> RepoResult<Vec<PostSummary>> {
        self.hit().list_posts().await
    }
    async fn get_post(&self, id: Uuid) -> RepoResult<Option<Post>> {
        self.hit().get_post(id).await
    }
    async fn create_post(&self, post: NewPost) -> RepoResult<Post> {
        self.hit().create_post(post).await
    }
    async fn update_post(&self, id: Uuid, title: &str, content: &str) -> RepoResult<Option<Post>> {
        self.hit().update_post(id, title, content).await
    }
    async fn delete_post(&self, id: Uuid) -> RepoResult<bool> {
        self.hit().delete_post(id).await
    }
    async fn list_comments(&self, post_id: Uuid) -> RepoResult<Vec<Comment>> {
        self.hit().list_comments(post_id).await
    }
    async fn get_comment(&self, id: Uuid) -> RepoResult<Option<Comment>> {
        self.hit().get_comment(id).await
    }
    async fn create_comment(&self, comment: NewComment) -> RepoResult<Comment> {
        self.hit().create_comment(comment).await
    }
    async fn update_comment(&self, id: Uuid, content: &str) -> RepoResult<Option<Comment>> {
        self.hit().update_comment(id, content).await
    }
    async fn delete_comment(&self, id: Uuid) -> RepoResult<bool> {
        self.hit().delete_comment(id).await
    }
}

// --- BrokenWritesRepo ---

/// What a mutating call on `BrokenWritesRepo` does.
#[derive(Clone, Copy)]
pub enum WriteFault {
    /// The write fails with a store error.
    Fail,
    /// The row vanished between lookup and write.
    Gone,
}

/// Reads and creates go to a `MemoryRepository`; updates and deletes of posts
/// and comments hit `fault`.
pub struct BrokenWritesRepo {
    inner: MemoryRepository,
    fault: WriteFault,
}

impl BrokenWritesRepo {
    pub fn new(fault: WriteFault) -> Self {
        Self {
            inner: MemoryRepository::new(),
            fault,
        }
    }

    fn updated<T>(&self) -> RepoResult<Option<T>> {
        match self.fault {
            WriteFault::Fail => Err(pool_timeout()),
            WriteFault::Gone => Ok(None),
        }
    }

    fn deleted(&self) -> RepoResult<bool> {
        match self.fault {
            WriteFault::Fail => Err(pool_timeout()),
            WriteFault::Gone => Ok(false),
        }
    }
}

#[async_trait]
impl Repository for BrokenWritesRepo {
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        self.inner.get_user(id).await
    }
    async fn get_user_by_nickname(&self, nickname: &str) -> RepoResult<Option<User>> {
        self.inner.get_user_by_nickname(nickname).await
    }
    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        self.inner.create_user(user).await
    }
    async fn list_posts(&self) -> RepoResult<Vec<PostSummary>> {
        self.inner.list_posts().await
    }
    async fn get_post(&self, id: Uuid) -> RepoResult<Option<Post>> {
        self.inner.get_post(id).await
    }
    async fn create_post(&self, post: NewPost) -> RepoResult<Post> {
        self.inner.create_post(post).await
    }
    async fn update_post(&self, _id: Uuid, _t: &str, _c: &str) -> RepoResult<Option<Post>> {
        self.updated()
    }
    async fn delete_post(&self, _id: Uuid) -> RepoResult<bool> {
        self.deleted()
    }
    async fn list_comments(&self, post_id: Uuid) -> RepoResult<Vec<Comment>> {
        self.inner.list_comments(post_id).await
    }
    async fn get_comment(&self, id: Uuid) -> RepoResult<Option<Comment>> {
        self.inner.get_comment(id).await
    }
    async fn create_comment(&self, comment: NewComment) -> RepoResult<Comment> {
        self.inner.create_comment(comment).await
    }
    async fn update_comment(&self, _id: Uuid, _content: &str) -> RepoResult<Option<Comment>> {
        self.updated()
    }
    async fn delete_comment(&self, _id: Uuid) -> RepoResult<bool> {
        self.deleted()
    }
}
