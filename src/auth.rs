use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{ApiError, failed},
    repository::RepositoryState,
};

/// Name of the cookie carrying `Bearer <token>`.
pub const AUTH_COOKIE: &str = "Authorization";

/// The only accepted authorization scheme.
pub const BEARER_SCHEME: &str = "Bearer";

/// Claims
///
/// Payload of an issued token. Timestamps are seconds since the Unix epoch.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the id of the user the token was issued to.
    pub sub: Uuid,
    /// Expiration Time (exp): the token is rejected after this instant.
    pub exp: i64,
    /// Issued At (iat).
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    /// Malformed token, bad signature, wrong algorithm, missing claims.
    #[error("token is invalid: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// `now + ttl` falls outside the representable date range.
    #[error("token lifetime is out of range")]
    Lifetime,

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// TokenService
///
/// Issues and verifies HS256 tokens. The secret is supplied by configuration and
/// lives for the lifetime of the process.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// A lifetime too large for `Duration` saturates; `issue` then reports
    /// `TokenError::Lifetime` instead of signing.
    pub fn from_config(config: &AppConfig) -> Self {
        let ttl = Duration::try_minutes(config.token_ttl_minutes).unwrap_or(Duration::MAX);
        Self::new(&config.jwt_secret, ttl)
    }

    /// issue
    ///
    /// Signs a token for `user_id` that expires `ttl` from now.
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::Lifetime)?;
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// verify
    ///
    /// Returns the subject of a well-formed, correctly signed, unexpired token.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(err),
            })
    }
}

/// parse_bearer
///
/// Splits a `Bearer <token>` value on whitespace. Any other scheme, or a missing
/// token, yields `None`.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token)) => Some(token),
        _ => None,
    }
}

/// The cookie set on a successful login.
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, format!("{BEARER_SCHEME} {token}")))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// A removal cookie matching the attributes of `session_cookie`.
pub fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, "")).path("/").build()
}

/// AuthUser
///
/// The resolved identity of an authenticated request: the user's id and the
/// nickname recorded at lookup time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub nickname: String,
}

/// AuthUser Extractor Implementation
///
/// This is the auth guard. It runs once per request as a route layer on every
/// protected route and caches the identity in the request extensions, so the
/// handler's own `AuthUser` argument is served without a second lookup.
///
/// 1. No `Authorization` cookie, or not `Bearer <token>`: 400, no store access.
/// 2. Token fails verification (malformed, bad signature, expired): 401.
/// 3. Token subject no longer exists: 401.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    TokenService: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // 0. Already resolved by the route layer
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        // 1. Cookie Extraction
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(AUTH_COOKIE)
            .and_then(|cookie| parse_bearer(cookie.value()).map(str::to_owned))
            .ok_or(ApiError::LoginRequired)?;

        // 2. Token Verification
        let user_id = TokenService::from_ref(state).verify(&token).map_err(|err| {
            tracing::debug!(error = %err, "token verification failed");
            ApiError::Unauthenticated
        })?;

        // 3. Store Lookup (the subject must still exist)
        let user = RepositoryState::from_ref(state)
            .get_user(user_id)
            .await
            .map_err(failed("authenticate"))?
            .ok_or_else(|| {
                tracing::debug!(%user_id, "token subject no longer exists");
                ApiError::Unauthenticated
            })?;

        // 4. Cache for the handler's own extraction
        let auth_user = AuthUser {
            id: user.id,
            nickname: user.nickname,
        };
        parts.extensions.insert(auth_user.clone());
        Ok(auth_user)
    }
}

/// Hashes a new password with the configured bcrypt cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Constant-time comparison of a candidate password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}
