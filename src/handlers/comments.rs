use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use uuid::Uuid;

use super::ResourceId;
use crate::{
    AppState,
    auth::AuthUser,
    error::{Action, ApiError, ErrorResponse, ResourceKind, failed},
    models::{CommentListResponse, CommentPayload, MessageResponse, NewComment},
    policy::{authorize, authorize_mutation, require_existing},
    validation::validate_comment,
};

/// create_comment
///
/// [Authenticated Route] Adds a comment under the post `{id}`. The post must
/// exist before the body is looked at.
#[utoipa::path(
    post,
    path = "/comments/{id}",
    tag = "comments",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = CommentPayload,
    responses(
        (status = 200, description = "Created", body = MessageResponse),
        (status = 400, description = "Login required, invalid id or store failure", body = ErrorResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse),
        (status = 412, description = "Malformed comment", body = ErrorResponse)
    )
)]
pub async fn create_comment(
    user: AuthUser,
    State(state): State<AppState>,
    ResourceId(post_id): ResourceId,
    payload: Result<Json<CommentPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    // 1. Parent Post Lookup
    let post = state.repo.get_post(post_id).await.map_err(failed("load post"))?;
    let post = require_existing(post)?;

    // 2. Body Validation
    let Json(payload) = payload?;
    let content = validate_comment(payload)?;

    // 3. Insert with the caller's identity snapshot
    let comment = state
        .repo
        .create_comment(NewComment {
            post_id: post.id,
            author_id: user.id,
            author_nickname: user.nickname,
            content,
        })
        .await
        .map_err(failed("create comment"))?;

    tracing::info!(comment_id = %comment.id, post_id = %post.id, "comment created");
    Ok(Json(MessageResponse::new("comment created")))
}

/// list_comments
///
/// [Public Route] Comments of the post `{id}`, oldest first.
#[utoipa::path(
    get,
    path = "/comments/{id}",
    tag = "comments",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comments of the post", body = CommentListResponse),
        (status = 400, description = "Invalid id or store failure", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse)
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    ResourceId(post_id): ResourceId,
) -> Result<Json<CommentListResponse>, ApiError> {
    let post = state.repo.get_post(post_id).await.map_err(failed("load post"))?;
    let post = require_existing(post)?;

    let comments = state
        .repo
        .list_comments(post.id)
        .await
        .map_err(failed("list comments"))?;
    Ok(Json(CommentListResponse { comments }))
}

/// update_comment
///
/// [Authenticated Route] Replaces the text of the caller's own comment `{id}`.
#[utoipa::path(
    put,
    path = "/comments/{id}",
    tag = "comments",
    params(("id" = Uuid, Path, description = "Comment ID")),
    request_body = CommentPayload,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 400, description = "Login required, invalid id or update failure", body = ErrorResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "No such comment", body = ErrorResponse),
        (status = 412, description = "Malformed comment", body = ErrorResponse)
    )
)]
pub async fn update_comment(
    user: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    payload: Result<Json<CommentPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    // 1. Existence and Ownership
    let existing = state.repo.get_comment(id).await.map_err(failed("load comment"))?;
    let comment = authorize_mutation(&user, existing, Action::Update)?;

    // 2. Body Validation
    let Json(payload) = payload?;
    let content = validate_comment(payload)?;

    // 3. Write
    state
        .repo
        .update_comment(comment.id, &content)
        .await
        .map_err(failed("update comment"))?
        .ok_or(ApiError::NotFound(ResourceKind::Comment))?;

    tracing::info!(comment_id = %comment.id, user_id = %user.id, "comment updated");
    Ok(Json(MessageResponse::new("comment updated")))
}

/// delete_comment
///
/// [Authenticated Route] Removes the caller's own comment `{id}`. The parent
/// post must still exist, so comments orphaned by a post deletion cannot be
/// removed through this route.
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "comments",
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Login required, invalid id or store failure", body = ErrorResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "No such comment or post", body = ErrorResponse)
    )
)]
pub async fn delete_comment(
    user: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<MessageResponse>, ApiError> {
    // 1. Comment Lookup
    let comment = state.repo.get_comment(id).await.map_err(failed("load comment"))?;
    let comment = require_existing(comment)?;

    // 2. Parent Post Lookup
    let post = state
        .repo
        .get_post(comment.post_id)
        .await
        .map_err(failed("load post"))?;
    require_existing(post)?;

    // 3. Ownership
    authorize(&user, &comment, Action::Delete)?;

    // 4. Delete
    if !state
        .repo
        .delete_comment(comment.id)
        .await
        .map_err(failed("delete comment"))?
    {
        return Err(ApiError::NotFound(ResourceKind::Comment));
    }

    tracing::info!(comment_id = %comment.id, user_id = %user.id, "comment deleted");
    Ok(Json(MessageResponse::new("comment deleted")))
}
