use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Every write goes through here. The router is layered with the auth guard, so
/// handlers receive an already resolved `AuthUser`; ownership of the targeted
/// post or comment is checked inside the handler.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /users/me
        .route("/users/me", get(handlers::me))
        // POST /posts
        .route("/posts", post(handlers::create_post))
        // PUT/DELETE /posts/{id}
        // Author only.
        .route(
            "/posts/{id}",
            put(handlers::update_post).delete(handlers::delete_post),
        )
        // POST /comments/{id}   (id = post)
        // PUT/DELETE /comments/{id}   (id = comment, author only)
        .route(
            "/comments/{id}",
            post(handlers::create_comment)
                .put(handlers::update_comment)
                .delete(handlers::delete_comment),
        )
}
