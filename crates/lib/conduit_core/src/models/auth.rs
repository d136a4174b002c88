//! Authentication domain models.
//!
//! These are internal domain models, distinct from the API wire models
//! (which wrap everything in a `{"user": ...}` envelope).

use serde::{Deserialize, Serialize};

/// Stored credentials plus the public profile columns of a user row.
///
/// Read-only from the auth pipeline's point of view: the store owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: String,
    pub email: String,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    /// Hex-encoded digest (or a bcrypt hash string).
    pub password_hash: String,
    /// Hex-encoded salt; empty for self-salting schemes.
    pub password_salt: String,
}

impl CredentialRecord {
    /// Claims to embed in a token issued for this user.
    pub fn claim_set(&self) -> ClaimSet {
        ClaimSet {
            sub: self.id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

/// Profile and password material for seeding a user.
#[derive(Debug, Clone)]
pub struct NewCredentials {
    pub email: String,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub password_hash: String,
    pub password_salt: String,
}

/// User-identifying claims supplied when issuing a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject — user ID (standard JWT `sub` claim).
    pub sub: String,
    pub email: String,
    pub username: String,
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub user: ClaimSet,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp). Absent for never-expiring tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}
