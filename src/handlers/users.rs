use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    AppState,
    auth::{AuthUser, cleared_session_cookie, hash_password, session_cookie, verify_password},
    error::{ApiError, ErrorResponse, failed},
    models::{LoginRequest, LoginResponse, MessageResponse, NewUser, SignupRequest, UserProfile},
    repository::RepositoryError,
    validation::{ValidationError, validate_signup},
};

/// signup
///
/// [Public Route] Registers a nickname. The password is stored as a bcrypt hash.
#[utoipa::path(
    post,
    path = "/users/signup",
    tag = "users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Registered", body = MessageResponse),
        (status = 400, description = "Store or hashing failure", body = ErrorResponse),
        (status = 412, description = "Invalid or taken nickname, weak password", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(request) = payload?;
    validate_signup(&request)?;

    let taken = state
        .repo
        .get_user_by_nickname(&request.nickname)
        .await
        .map_err(failed("sign up"))?;
    if taken.is_some() {
        return Err(ValidationError::DuplicateNickname.into());
    }

    let password_hash = hash_password(&request.password, state.config.bcrypt_cost)?;

    // The lookup above races with concurrent signups; the unique index decides.
    let user = match state
        .repo
        .create_user(NewUser {
            nickname: request.nickname,
            password_hash,
        })
        .await
    {
        Ok(user) => user,
        Err(RepositoryError::Duplicate(_)) => return Err(ValidationError::DuplicateNickname.into()),
        Err(err) => return Err(failed("sign up")(err)),
    };

    tracing::info!(user_id = %user.id, nickname = %user.nickname, "user signed up");
    Ok((StatusCode::CREATED, Json(MessageResponse::new("signed up"))))
}

/// login
///
/// [Public Route] Checks the credentials and sets the `Authorization` cookie to
/// `Bearer <token>`. The token is echoed in the body for non-browser clients.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, cookie set", body = LoginResponse),
        (status = 400, description = "Store or token failure", body = ErrorResponse),
        (status = 412, description = "Unknown nickname or wrong password", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let Json(request) = payload?;

    // 1. Credential Check (unknown nickname and wrong password look the same)
    let user = state
        .repo
        .get_user_by_nickname(&request.nickname)
        .await
        .map_err(failed("log in"))?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&request.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "password mismatch");
        return Err(ApiError::InvalidCredentials);
    }

    // 2. Token Issue and Cookie
    let token = state.tokens.issue(user.id).map_err(ApiError::TokenIssue)?;
    let jar = jar.add(session_cookie(&token, state.config.cookie_secure));

    tracing::info!(user_id = %user.id, "user logged in");
    Ok((jar, Json(LoginResponse { token })))
}

/// logout
///
/// [Public Route] Clears the `Authorization` cookie. Tokens are stateless, so an
/// already issued token stays valid until it expires.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "users",
    responses((status = 200, description = "Cookie cleared", body = MessageResponse))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.remove(cleared_session_cookie()),
        Json(MessageResponse::new("logged out")),
    )
}

/// me
///
/// [Authenticated Route] The identity resolved by the auth guard.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 400, description = "Login required", body = ErrorResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn me(user: AuthUser) -> Json<UserProfile> {
    Json(UserProfile {
        user_id: user.id,
        nickname: user.nickname,
    })
}
