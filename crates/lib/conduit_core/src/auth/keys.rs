//! Signing key resolution.
//!
//! The key is loaded once at startup. Anything that goes wrong here is fatal
//! to bootstrap; once a [`SigningKey`] exists, token handling never fails
//! because of key material.

use std::path::{Path, PathBuf};

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use thiserror::Error;
use tracing::info;

/// Length of a generated secret.
const GENERATED_SECRET_LEN: usize = 64;

/// Signing key bootstrap errors.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("signing key is empty")]
    Empty,

    #[error("cannot read signing key file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot persist generated signing key to {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// HMAC secret shared by issuance and validation.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Use `secret` directly. Rejects an empty secret.
    pub fn from_secret(secret: impl AsRef<[u8]>) -> Result<Self, KeyError> {
        let bytes = secret.as_ref();
        if bytes.is_empty() {
            return Err(KeyError::Empty);
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Read a secret from `path`, trimming surrounding whitespace.
    pub fn from_file(path: &Path) -> Result<Self, KeyError> {
        let contents = std::fs::read_to_string(path).map_err(|source| KeyError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_secret(contents.trim())
    }

    /// Load the persisted secret at `path`, generating and writing one on
    /// first use.
    pub fn load_or_generate(path: &Path) -> Result<Self, KeyError> {
        if let Ok(existing) = std::fs::read_to_string(path) {
            let trimmed = existing.trim();
            if !trimmed.is_empty() {
                return Self::from_secret(trimmed);
            }
        }
        let secret: String = rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_SECRET_LEN)
            .map(char::from)
            .collect();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| KeyError::Persist {
                path: path.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, &secret).map_err(|source| KeyError::Persist {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "generated new JWT secret");
        Self::from_secret(secret)
    }

    /// Resolve the key: explicit secret → secret file → persisted generated
    /// secret under the user data dir.
    pub fn resolve(secret: Option<&str>, secret_file: Option<&Path>) -> Result<Self, KeyError> {
        if let Some(secret) = secret.filter(|s| !s.is_empty()) {
            return Self::from_secret(secret);
        }
        if let Some(path) = secret_file {
            return Self::from_file(path);
        }
        Self::load_or_generate(&default_secret_path())
    }

    /// [`SigningKey::resolve`] from `JWT_SECRET` / `JWT_SECRET_FILE`.
    pub fn from_env() -> Result<Self, KeyError> {
        let secret = std::env::var("JWT_SECRET").ok();
        let secret_file = std::env::var_os("JWT_SECRET_FILE").map(PathBuf::from);
        Self::resolve(secret.as_deref(), secret_file.as_deref())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

/// Path to the persisted JWT secret file.
pub fn default_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("conduit")
        .join("jwt-secret")
}
