use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepoResult, Repository, RepositoryError};
use crate::models::{Comment, NewComment, NewPost, NewUser, Post, PostSummary, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

/// MemoryRepository
///
/// An in-process `Repository` used for local runs without `DATABASE_URL` and for
/// tests. Rows live in insertion-ordered vectors behind a single `RwLock`, so
/// every operation is atomic with respect to the others.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_nickname(&self, nickname: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.nickname == nickname).cloned())
    }

    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.nickname == user.nickname) {
            return Err(RepositoryError::Duplicate("nickname"));
        }
        let created = User {
            id: Uuid::new_v4(),
            nickname: user.nickname,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    /// list_posts
    ///
    /// Walks the table newest-inserted first before the stable sort, so posts
    /// sharing a timestamp still come out newest first.
    async fn list_posts(&self) -> RepoResult<Vec<PostSummary>> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables.posts.iter().rev().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts.into_iter().map(PostSummary::from).collect())
    }

    async fn get_post(&self, id: Uuid) -> RepoResult<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create_post(&self, post: NewPost) -> RepoResult<Post> {
        let now = Utc::now();
        let created = Post {
            id: Uuid::new_v4(),
            author_id: post.author_id,
            author_nickname: post.author_nickname,
            title: post.title,
            content: post.content,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.posts.push(created.clone());
        Ok(created)
    }

    async fn update_post(&self, id: Uuid, title: &str, content: &str) -> RepoResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.title = title.to_string();
            post.content = content.to_string();
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok(tables.posts.len() < before)
    }

    async fn list_comments(&self, post_id: Uuid) -> RepoResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn get_comment(&self, id: Uuid) -> RepoResult<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn create_comment(&self, comment: NewComment) -> RepoResult<Comment> {
        let now = Utc::now();
        let created = Comment {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_nickname: comment.author_nickname,
            content: comment.content,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.comments.push(created.clone());
        Ok(created)
    }

    async fn update_comment(&self, id: Uuid, content: &str) -> RepoResult<Option<Comment>> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.iter_mut().find(|c| c.id == id).map(|comment| {
            comment.content = content.to_string();
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        Ok(tables.comments.len() < before)
    }
}
