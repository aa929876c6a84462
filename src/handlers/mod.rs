//! Request handlers, one module per resource.
//!
//! Handlers take the resolved `AuthUser` first (on protected routes), then the
//! shared state, the path id, and the body last. Bodies are extracted as
//! `Result<Json<_>, JsonRejection>` so a malformed body is reported only once
//! the existence and ownership checks have passed.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;

pub mod comments;
pub mod posts;
pub mod users;

pub use comments::{create_comment, delete_comment, list_comments, update_comment};
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use users::{login, logout, me, signup};

/// ResourceId
///
/// The `{id}` path segment parsed as a UUID. Anything else is rejected with 400
/// before a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub Uuid);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidId)?;
        Uuid::parse_str(&raw)
            .map(ResourceId)
            .map_err(|_| ApiError::InvalidId)
    }
}
