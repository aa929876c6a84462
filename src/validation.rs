//! Input shape checks for request bodies.
//!
//! Every check here is pure: it inspects a payload and either yields the typed
//! input a handler needs or a [`ValidationError`] that renders as a 412.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::models::{CommentPayload, PostPayload, SignupRequest};

pub const MIN_NICKNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 4;

/// Why a single text field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    /// Absent, `null`, or blank after trimming.
    Missing,
    /// Present but not a JSON string.
    WrongType,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request body is malformed")]
    MalformedBody,

    #[error("post title {0}")]
    Title(FieldProblem),

    #[error("post content {0}")]
    Content(FieldProblem),

    #[error("comment {0}")]
    Comment(FieldProblem),

    #[error("nickname must be at least 3 characters of letters and digits")]
    Nickname,

    #[error("password must be at least 4 characters")]
    PasswordTooShort,

    #[error("password must not contain the nickname")]
    PasswordContainsNickname,

    #[error("password confirmation does not match")]
    PasswordMismatch,

    #[error("nickname is already taken")]
    DuplicateNickname,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("is required"),
            Self::WrongType => f.write_str("must be a string"),
        }
    }
}

/// A post body that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub content: String,
}

/// text_field
///
/// Classifies one raw JSON field. Blank strings count as missing.
pub fn text_field(value: Option<Value>) -> Result<String, FieldProblem> {
    match value {
        None | Some(Value::Null) => Err(FieldProblem::Missing),
        Some(Value::String(text)) if text.trim().is_empty() => Err(FieldProblem::Missing),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(FieldProblem::WrongType),
    }
}

/// validate_post
///
/// Both fields missing is reported as a malformed body and takes priority over
/// per-field problems; otherwise the title is checked before the content.
pub fn validate_post(payload: PostPayload) -> Result<PostInput, ValidationError> {
    match (text_field(payload.title), text_field(payload.content)) {
        (Ok(title), Ok(content)) => Ok(PostInput { title, content }),
        (Err(FieldProblem::Missing), Err(FieldProblem::Missing)) => {
            Err(ValidationError::MalformedBody)
        }
        (Err(problem), _) => Err(ValidationError::Title(problem)),
        (_, Err(problem)) => Err(ValidationError::Content(problem)),
    }
}

pub fn validate_comment(payload: CommentPayload) -> Result<String, ValidationError> {
    text_field(payload.comment).map_err(ValidationError::Comment)
}

/// validate_signup
///
/// Nickname format, password length, nickname-in-password, then confirmation.
/// Uniqueness is checked against the store by the caller.
pub fn validate_signup(request: &SignupRequest) -> Result<(), ValidationError> {
    let nickname = request.nickname.as_str();
    if nickname.chars().count() < MIN_NICKNAME_LEN
        || !nickname.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ValidationError::Nickname);
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if request.password.contains(nickname) {
        return Err(ValidationError::PasswordContainsNickname);
    }
    if request.password != request.confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
