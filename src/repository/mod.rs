use crate::models::{Comment, NewComment, NewPost, NewUser, Post, PostSummary, User};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

/// RepositoryError
///
/// Failures surfaced by a persistence backend. Handlers never inspect the
/// database error itself; they log it and answer with a generic failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write (e.g. a taken nickname).
    #[error("duplicate value for unique field `{0}`")]
    Duplicate(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Repository Trait
///
/// The abstract contract for all persistence operations. Handlers only see this
/// trait, so the Postgres store and the in-memory store are interchangeable.
///
/// Every operation touches a single row and is atomic on its own; nothing here
/// spans more than one write.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>>;
    async fn get_user_by_nickname(&self, nickname: &str) -> RepoResult<Option<User>>;
    /// Fails with `RepositoryError::Duplicate("nickname")` when the nickname is taken.
    async fn create_user(&self, user: NewUser) -> RepoResult<User>;

    // --- Posts ---
    /// All posts, newest first.
    async fn list_posts(&self) -> RepoResult<Vec<PostSummary>>;
    async fn get_post(&self, id: Uuid) -> RepoResult<Option<Post>>;
    async fn create_post(&self, post: NewPost) -> RepoResult<Post>;
    /// Replaces title and content and bumps `updated_at`. `None` if the post is gone.
    async fn update_post(&self, id: Uuid, title: &str, content: &str) -> RepoResult<Option<Post>>;
    /// Returns whether a row was removed. Comments of the post are left untouched.
    async fn delete_post(&self, id: Uuid) -> RepoResult<bool>;

    // --- Comments ---
    /// Comments of one post in insertion order.
    async fn list_comments(&self, post_id: Uuid) -> RepoResult<Vec<Comment>>;
    async fn get_comment(&self, id: Uuid) -> RepoResult<Option<Comment>>;
    async fn create_comment(&self, comment: NewComment) -> RepoResult<Comment>;
    async fn update_comment(&self, id: Uuid, content: &str) -> RepoResult<Option<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> RepoResult<bool>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;
