//! Authorization policy shared by every mutating handler.
//!
//! Checks always run in the same order: the record must exist, then the caller
//! must own it, and only then is the request body validated by the handler.

use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{Action, ApiError, ResourceKind},
    models::{Comment, Post},
};

/// A stored record with a single owning user.
pub trait Owned {
    const KIND: ResourceKind;

    /// The id of the user allowed to mutate the record.
    fn owner_id(&self) -> Uuid;
}

impl Owned for Post {
    const KIND: ResourceKind = ResourceKind::Post;

    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for Comment {
    const KIND: ResourceKind = ResourceKind::Comment;

    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

/// require_existing
///
/// Existence check: `None` becomes a 404 naming the record's kind.
pub fn require_existing<T: Owned>(record: Option<T>) -> Result<T, ApiError> {
    record.ok_or(ApiError::NotFound(T::KIND))
}

/// authorize
///
/// Ownership predicate, evaluated against the stable owner id rather than the
/// nickname snapshot.
pub fn authorize<T: Owned>(user: &AuthUser, record: &T, action: Action) -> Result<(), ApiError> {
    if record.owner_id() == user.id {
        return Ok(());
    }
    tracing::warn!(
        user_id = %user.id,
        owner_id = %record.owner_id(),
        resource = %T::KIND,
        %action,
        "ownership check failed"
    );
    Err(ApiError::Forbidden {
        action,
        resource: T::KIND,
    })
}

/// authorize_mutation
///
/// Existence followed by ownership, for handlers with nothing to check in between.
pub fn authorize_mutation<T: Owned>(
    user: &AuthUser,
    record: Option<T>,
    action: Action,
) -> Result<T, ApiError> {
    let record = require_existing(record)?;
    authorize(user, &record, action)?;
    Ok(record)
}
