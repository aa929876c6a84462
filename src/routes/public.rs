use crate::{AppState, ApiDoc, handlers};
use axum::{
    Json, Router,
    routing::{get, post},
};
use utoipa::OpenApi;

/// Public Router Module
///
/// Endpoints open to any client: account creation, the login/logout pair and
/// read-only access to posts and comments.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers; touches nothing.
        .route("/health", get(|| async { "ok" }))
        // GET /api-docs/openapi.json
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        // POST /users/signup
        .route("/users/signup", post(handlers::signup))
        // POST /auth/login
        // Sets the `Authorization` cookie on success.
        .route("/auth/login", post(handlers::login))
        // POST /auth/logout
        .route("/auth/logout", post(handlers::logout))
        // GET /posts
        // Newest first, without content.
        .route("/posts", get(handlers::list_posts))
        // GET /posts/{id}
        .route("/posts/{id}", get(handlers::get_post))
        // GET /comments/{id}
        // `{id}` is the post id here; on the write routes it is the comment id.
        .route("/comments/{id}", get(handlers::list_comments))
}
