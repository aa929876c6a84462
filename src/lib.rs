use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod repository;
pub mod validation;

pub mod routes;
use auth::{AuthUser, TokenService};
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::ApiError;
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document aggregated from the `#[utoipa::path]` handlers and the
/// `ToSchema` models. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::users::signup, handlers::users::login, handlers::users::logout,
        handlers::users::me,
        handlers::posts::list_posts, handlers::posts::get_post, handlers::posts::create_post,
        handlers::posts::update_post, handlers::posts::delete_post,
        handlers::comments::list_comments, handlers::comments::create_comment,
        handlers::comments::update_comment, handlers::comments::delete_comment
    ),
    components(
        schemas(
            models::Post, models::PostSummary, models::Comment, models::PostPayload,
            models::CommentPayload, models::SignupRequest, models::LoginRequest,
            models::LoginResponse, models::UserProfile, models::MessageResponse,
            models::PostListResponse, models::PostDetailResponse,
            models::CommentListResponse, error::ErrorResponse,
        )
    ),
    tags(
        (name = "users", description = "Accounts and sessions"),
        (name = "posts", description = "Board posts"),
        (name = "comments", description = "Comments on posts")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Shared by every request: the store, the token service built from the
/// configured secret, and the configuration itself.
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryState,
    pub tokens: TokenService,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        Self {
            repo,
            tokens: TokenService::from_config(&config),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> TokenService {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// The auth guard for `authenticated_routes`. Extracting `AuthUser` either
/// rejects the request (400 without a cookie, 401 for a bad token or a vanished
/// user) or caches the identity for the handler.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles public and guarded routes, registers the state and wraps the
/// whole thing in the request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(public::public_routes())
        // Same paths as some public routes, different methods. `route_layer`
        // keeps the guard off the public methods after the merge.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .with_state(state);

    // 3. Request Id and Tracing Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer (outermost)
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer` carrying method, uri and the `x-request-id` set by the
/// layer above it, so every log line of one request shares an id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
