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
    models::{MessageResponse, NewPost, PostDetailResponse, PostListResponse, PostPayload},
    policy::{authorize_mutation, require_existing},
    validation::validate_post,
};

/// create_post
///
/// [Authenticated Route] Publishes a post under the caller's id and nickname.
/// Title and content must both be non-blank strings; nothing is stored otherwise.
#[utoipa::path(
    post,
    path = "/posts",
    tag = "posts",
    request_body = PostPayload,
    responses(
        (status = 200, description = "Created", body = MessageResponse),
        (status = 400, description = "Login required or store failure", body = ErrorResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 412, description = "Malformed title or content", body = ErrorResponse)
    )
)]
pub async fn create_post(
    user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<PostPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;
    let input = validate_post(payload)?;

    let post = state
        .repo
        .create_post(NewPost {
            author_id: user.id,
            author_nickname: user.nickname,
            title: input.title,
            content: input.content,
        })
        .await
        .map_err(failed("create post"))?;

    tracing::info!(post_id = %post.id, user_id = %post.author_id, "post created");
    Ok(Json(MessageResponse::new("post created")))
}

/// list_posts
///
/// [Public Route] Every post, newest first, without its content.
#[utoipa::path(
    get,
    path = "/posts",
    tag = "posts",
    responses(
        (status = 200, description = "All posts", body = PostListResponse),
        (status = 400, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<PostListResponse>, ApiError> {
    let posts = state.repo.list_posts().await.map_err(failed("list posts"))?;
    Ok(Json(PostListResponse { posts }))
}

/// get_post
///
/// [Public Route] A single post including its content.
#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = PostDetailResponse),
        (status = 400, description = "Invalid id or store failure", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse)
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<PostDetailResponse>, ApiError> {
    let post = state.repo.get_post(id).await.map_err(failed("load post"))?;
    let result = require_existing(post)?;
    Ok(Json(PostDetailResponse { result }))
}

/// update_post
///
/// [Authenticated Route] Replaces title and content of the caller's own post.
/// Existence, then ownership, then body validation.
#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = PostPayload,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 400, description = "Login required, invalid id or update failure", body = ErrorResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse),
        (status = 412, description = "Malformed title or content", body = ErrorResponse)
    )
)]
pub async fn update_post(
    user: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    payload: Result<Json<PostPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    // 1. Existence and Ownership
    let existing = state.repo.get_post(id).await.map_err(failed("load post"))?;
    let post = authorize_mutation(&user, existing, Action::Update)?;

    // 2. Body Validation
    let Json(payload) = payload?;
    let input = validate_post(payload)?;

    // 3. Write
    state
        .repo
        .update_post(post.id, &input.title, &input.content)
        .await
        .map_err(failed("update post"))?
        // Deleted between the lookup and the write.
        .ok_or(ApiError::NotFound(ResourceKind::Post))?;

    tracing::info!(post_id = %post.id, user_id = %user.id, "post updated");
    Ok(Json(MessageResponse::new("post updated")))
}

/// delete_post
///
/// [Authenticated Route] Removes the caller's own post. Its comments stay in
/// the store, orphaned.
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Login required, invalid id or store failure", body = ErrorResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse)
    )
)]
pub async fn delete_post(
    user: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<MessageResponse>, ApiError> {
    // 1. Existence and Ownership
    let existing = state.repo.get_post(id).await.map_err(failed("load post"))?;
    let post = authorize_mutation(&user, existing, Action::Delete)?;

    // 2. Delete (comments are left in place)
    if !state.repo.delete_post(post.id).await.map_err(failed("delete post"))? {
        return Err(ApiError::NotFound(ResourceKind::Post));
    }

    tracing::info!(post_id = %post.id, user_id = %user.id, "post deleted");
    Ok(Json(MessageResponse::new("post deleted")))
}
