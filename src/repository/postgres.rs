use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RepoResult, Repository, RepositoryError};
use crate::models::{Comment, NewComment, NewPost, NewUser, Post, PostSummary, User};

const POST_COLUMNS: &str =
    "id, author_id, author_nickname, title, content, created_at, updated_at";
const POST_SUMMARY_COLUMNS: &str =
    "id, author_id, author_nickname, title, created_at, updated_at";
const COMMENT_COLUMNS: &str =
    "id, post_id, author_id, author_nickname, content, created_at, updated_at";

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL. Queries are checked at
/// runtime, so building the crate needs no live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn map_unique(field: &'static str) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Duplicate(field),
        _ => RepositoryError::Database(err),
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, nickname, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user_by_nickname(&self, nickname: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, nickname, password_hash, created_at FROM users WHERE nickname = $1",
        )
        .bind(nickname)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// create_user
    ///
    /// Relies on the unique index on `users.nickname`; a concurrent signup with the
    /// same nickname loses here even if it passed the handler's pre-check.
    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, nickname, password_hash, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, nickname, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.nickname)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique("nickname"))
    }

    async fn list_posts(&self) -> RepoResult<Vec<PostSummary>> {
        let query =
            format!("SELECT {POST_SUMMARY_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC");
        let posts = sqlx::query_as::<_, PostSummary>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn get_post(&self, id: Uuid) -> RepoResult<Option<Post>> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn create_post(&self, post: NewPost) -> RepoResult<Post> {
        let query = format!(
            "INSERT INTO posts (id, author_id, author_nickname, title, content, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING {POST_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Post>(&query)
            .bind(Uuid::new_v4())
            .bind(post.author_id)
            .bind(&post.author_nickname)
            .bind(&post.title)
            .bind(&post.content)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_post(&self, id: Uuid, title: &str, content: &str) -> RepoResult<Option<Post>> {
        let query = format!(
            "UPDATE posts SET title = $2, content = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {POST_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(title)
            .bind(content)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_post(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// list_comments
    ///
    /// Creation order; `id` breaks ties between comments stamped in the same microsecond.
    async fn list_comments(&self, post_id: Uuid) -> RepoResult<Vec<Comment>> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = $1 ORDER BY created_at ASC, id ASC"
        );
        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(post_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn get_comment(&self, id: Uuid) -> RepoResult<Option<Comment>> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn create_comment(&self, comment: NewComment) -> RepoResult<Comment> {
        let query = format!(
            "INSERT INTO comments (id, post_id, author_id, author_nickname, content, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING {COMMENT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Comment>(&query)
            .bind(Uuid::new_v4())
            .bind(comment.post_id)
            .bind(comment.author_id)
            .bind(&comment.author_nickname)
            .bind(&comment.content)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_comment(&self, id: Uuid, content: &str) -> RepoResult<Option<Comment>> {
        let query = format!(
            "UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_comment(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
