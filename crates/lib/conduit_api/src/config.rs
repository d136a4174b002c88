//! API server configuration.

use std::path::PathBuf;

use chrono::Duration;
use conduit_core::auth::keys::{KeyError, SigningKey};
use conduit_core::auth::password::PasswordScheme;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// Explicit JWT signing secret.
    pub jwt_secret: Option<String>,
    /// File holding the JWT signing secret.
    pub jwt_secret_file: Option<PathBuf>,
    /// Lifetime of issued tokens. `None` issues never-expiring tokens.
    pub token_ttl: Option<Duration>,
    /// Scheme the credential store's hashes were written with.
    pub password_scheme: PasswordScheme,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            pg_connection_url: "postgres://localhost:5432/conduit".into(),
            jwt_secret: None,
            jwt_secret_file: None,
            token_ttl: None,
            password_scheme: PasswordScheme::default(),
        }
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable          | Default                                 |
    /// |-------------------|-----------------------------------------|
    /// | `BIND_ADDR`       | `127.0.0.1:3000`                        |
    /// | `DATABASE_URL`    | `postgres://localhost:5432/conduit`     |
    /// | `JWT_SECRET`      | unset                                   |
    /// | `JWT_SECRET_FILE` | unset (generated & persisted to file)   |
    /// | `TOKEN_TTL_SECS`  | unset (tokens never expire)             |
    /// | `PASSWORD_SCHEME` | `sha512`                                |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            pg_connection_url: std::env::var("DATABASE_URL")
                .unwrap_or(defaults.pg_connection_url),
            jwt_secret: std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            jwt_secret_file: std::env::var_os("JWT_SECRET_FILE").map(PathBuf::from),
            token_ttl: std::env::var("TOKEN_TTL_SECS")
                .ok()
                .map(|v| parse_token_ttl(&v))
                .transpose()?
                .flatten(),
            password_scheme: match std::env::var("PASSWORD_SCHEME") {
                Ok(v) => v.parse().map_err(|e| ConfigError::Invalid {
                    name: "PASSWORD_SCHEME",
                    message: format!("{e}"),
                })?,
                Err(_) => defaults.password_scheme,
            },
        })
    }

    /// Load the signing key this configuration points at.
    pub fn signing_key(&self) -> Result<SigningKey, KeyError> {
        SigningKey::resolve(self.jwt_secret.as_deref(), self.jwt_secret_file.as_deref())
    }
}

/// Parse a TTL in seconds. `0` means "never expire".
pub fn parse_token_ttl(value: &str) -> Result<Option<Duration>, ConfigError> {
    let secs: i64 = value.trim().parse().map_err(|e| ConfigError::Invalid {
        name: "TOKEN_TTL_SECS",
        message: format!("{e}"),
    })?;
    match secs {
        0 => Ok(None),
        s if s < 0 => Err(ConfigError::Invalid {
            name: "TOKEN_TTL_SECS",
            message: "must not be negative".into(),
        }),
        s => Duration::try_seconds(s)
            .map(Some)
            .ok_or_else(|| ConfigError::Invalid {
                name: "TOKEN_TTL_SECS",
                message: "out of range".into(),
            }),
    }
}
