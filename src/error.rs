//! API error type and the error half of the response envelope.

use std::fmt;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{auth::TokenError, repository::RepositoryError, validation::ValidationError};

/// The kinds of resource a handler can fail to find or be denied access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Post,
    Comment,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => f.write_str("post"),
            Self::Comment => f.write_str("comment"),
        }
    }
}

/// Mutations guarded by the ownership policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update => f.write_str("update"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// ApiError
///
/// Every way a request can fail. Handlers return `Result<_, ApiError>` and the
/// `IntoResponse` impl picks the status code and renders `{"errorMessage": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable `Authorization` cookie on the request.
    #[error("login required")]
    LoginRequired,

    /// The cookie carried a token that failed verification, or its user is gone.
    #[error("login required")]
    Unauthenticated,

    /// A path id that does not parse as an identifier.
    #[error("data format is incorrect")]
    InvalidId,

    #[error(transparent)]
    MalformedInput(#[from] ValidationError),

    #[error("check your nickname or password")]
    InvalidCredentials,

    #[error("{0} does not exist")]
    NotFound(ResourceKind),

    #[error("no permission to {action} this {resource}")]
    Forbidden {
        action: Action,
        resource: ResourceKind,
    },

    /// A store operation failed. Only the action name reaches the client.
    #[error("failed to {action}")]
    Persistence {
        action: &'static str,
        #[source]
        source: RepositoryError,
    },

    #[error("failed to issue login token")]
    TokenIssue(#[source] TokenError),

    #[error("failed to process credentials")]
    Credentials(#[from] bcrypt::BcryptError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::LoginRequired | Self::InvalidId => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::MalformedInput(_) | Self::InvalidCredentials => StatusCode::PRECONDITION_FAILED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Persistence { .. } | Self::TokenIssue(_) | Self::Credentials(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

/// failed
///
/// Adapter for `map_err` on repository calls:
/// `state.repo.create_post(new).await.map_err(failed("create post"))?`.
pub fn failed(action: &'static str) -> impl FnOnce(RepositoryError) -> ApiError {
    move |source| ApiError::Persistence { action, source }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected request body");
        Self::MalformedInput(ValidationError::MalformedBody)
    }
}

/// ErrorResponse
///
/// The single error envelope used by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ErrorResponse {
    pub error_message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Persistence { action, source } => {
                tracing::error!(error = %source, action = %action, "persistence failure");
            }
            Self::TokenIssue(source) => tracing::error!(error = %source, "token issue failure"),
            Self::Credentials(source) => tracing::error!(error = %source, "password hashing failure"),
            _ => tracing::debug!(status = status.as_u16(), error = %self, "request rejected"),
        }

        let body = ErrorResponse {
            error_message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
