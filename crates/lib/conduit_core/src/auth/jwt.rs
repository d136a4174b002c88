//! JWT issuance and validation.
//!
//! Tokens are standard HS256 JWS compact strings. The service holds the one
//! active signing key; validation pins the algorithm so a token claiming
//! any other `alg` is rejected as malformed rather than checked.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use super::keys::SigningKey;
use crate::models::auth::{ClaimSet, TokenClaims};

/// Why a token was not accepted (or could not be produced).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not verify")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Per-issuance options.
#[derive(Debug, Clone, Default)]
pub struct IssueOptions {
    /// When the token stops being valid. `None` issues a never-expiring
    /// token; callers opt into that explicitly.
    pub expires_at: Option<DateTime<Utc>>,
}

impl IssueOptions {
    pub fn never_expires() -> Self {
        Self { expires_at: None }
    }

    pub fn expires_at(at: DateTime<Utc>) -> Self {
        Self {
            expires_at: Some(at),
        }
    }
}

/// Signs and verifies access tokens with a single process-wide key.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    const ALGORITHM: Algorithm = Algorithm::HS256;

    pub fn new(key: &SigningKey) -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        // `exp` is optional: never-expiring tokens simply omit it.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        // A token is expired the second its `exp` passes.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            validation,
        }
    }

    /// Toggle rejection of tokens whose `exp` has passed.
    pub fn with_expiry_check(mut self, enabled: bool) -> Self {
        self.validation.validate_exp = enabled;
        self
    }

    /// Sign a token carrying `claims`.
    pub fn issue(&self, claims: &ClaimSet, options: &IssueOptions) -> Result<String, TokenError> {
        let claims = TokenClaims {
            user: claims.clone(),
            iat: Utc::now().timestamp(),
            exp: options.expires_at.map(|at| at.timestamp()),
        };
        encode(&Header::new(Self::ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify `token` and return its claims.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Self::ALGORITHM)
            .field("validate_exp", &self.validation.validate_exp)
            .finish_non_exhaustive()
    }
}
