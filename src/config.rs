use std::env;

use thiserror::Error;
use uuid::Uuid;

/// Minimum accepted length (in bytes) of the token signing secret in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 525_600;

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded and
/// shared with handlers and the auth guard through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Runtime environment marker. Selects log format and secret strictness.
    pub env: Env,
    /// Postgres connection string. `None` selects the in-memory store (local only).
    pub db_url: Option<String>,
    /// Secret used to sign and verify bearer tokens. Never has a built-in value.
    pub jwt_secret: String,
    /// Lifetime of an issued token, in minutes.
    pub token_ttl_minutes: i64,
    /// bcrypt work factor used when hashing new passwords.
    pub bcrypt_cost: u32,
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Whether the `Authorization` cookie is flagged `Secure`.
    pub cookie_secure: bool,
}

/// Env
///
/// The runtime context: developer conveniences in `Local`, strict settings in `Production`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// Configuration errors surfaced at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("JWT_SECRET must be at least 32 bytes in production")]
    WeakSecret,
}

impl Default for AppConfig {
    /// default
    ///
    /// Test scaffolding only. The signing secret is freshly generated per instance
    /// so no secret value ever lives in source.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_url: None,
            jwt_secret: format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            cookie_secure: false,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from process environment variables. Fails fast on
    /// missing or malformed values instead of falling back to insecure defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV").as_deref() {
            Some("production") => Env::Production,
            Some("local") | None => Env::Local,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "APP_ENV",
                    value: other.to_string(),
                });
            }
        };

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if env == Env::Production && jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }

        let db_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        if env == Env::Production && db_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let token_ttl_minutes = parse_or(&lookup, "TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&token_ttl_minutes) {
            return Err(ConfigError::Invalid {
                name: "TOKEN_TTL_MINUTES",
                value: token_ttl_minutes.to_string(),
            });
        }

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let cookie_secure = parse_or(&lookup, "COOKIE_SECURE", env == Env::Production)?;

        Ok(Self {
            env,
            db_url,
            jwt_secret,
            token_ttl_minutes,
            bcrypt_cost,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            cookie_secure,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}
