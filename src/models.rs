use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Stored Records ---

/// User
///
/// A registered account as stored in the `users` table. Not `Serialize`: the
/// password hash never leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    // Unique across all users.
    pub nickname: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new user; the id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nickname: String,
    pub password_hash: String,
}

/// Post
///
/// A board post, serialized with the client-facing field names
/// (`postId`, `userId`, `nickname`). `author_nickname` is a snapshot taken at
/// creation time.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Post {
    #[serde(rename = "postId")]
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub author_id: Uuid,
    #[serde(rename = "nickname")]
    pub author_nickname: String,
    pub title: String,
    pub content: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// PostSummary
///
/// The listing projection of a post: everything except `content`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PostSummary {
    #[serde(rename = "postId")]
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub author_id: Uuid,
    #[serde(rename = "nickname")]
    pub author_nickname: String,
    pub title: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            author_nickname: post.author_nickname,
            title: post.title,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub author_nickname: String,
    pub title: String,
    pub content: String,
}

/// Comment
///
/// A comment attached to a post. `post_id` is not a foreign key: deleting the
/// parent post leaves the comment in place.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Comment {
    #[serde(rename = "commentId")]
    pub id: Uuid,
    pub post_id: Uuid,
    #[serde(rename = "userId")]
    pub author_id: Uuid,
    #[serde(rename = "nickname")]
    pub author_nickname: String,
    #[serde(rename = "comment")]
    pub content: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_nickname: String,
    pub content: String,
}

// --- Request Payloads (Input Schemas) ---

/// PostPayload
///
/// Body of `POST /posts` and `PUT /posts/{id}`. Fields are kept as raw JSON so
/// that a missing field and a wrongly typed field produce different 412 messages.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct PostPayload {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub content: Option<Value>,
}

/// Body of `POST /comments/{postId}` and `PUT /comments/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CommentPayload {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub comment: Option<Value>,
}

/// SignupRequest
///
/// Body of `POST /users/signup`. `confirm` must repeat `password`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SignupRequest {
    pub nickname: String,
    pub password: String,
    #[serde(alias = "confirmPassword")]
    pub confirm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub nickname: String,
    pub password: String,
}

// --- Response Schemas (Output) ---

/// MessageResponse
///
/// The success half of the response envelope. Errors use `ErrorResponse` in
/// `crate::error`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
}

/// The caller's own identity, as returned by `GET /users/me`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PostListResponse {
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PostDetailResponse {
    pub result: Post,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CommentListResponse {
    pub comments: Vec<Comment>,
}
