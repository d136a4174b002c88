//! Authentication building blocks.
//!
//! Password verification, signing key bootstrap, JWT issuance/validation and
//! the credential queries, shared by `conduit_api` and the server binary.

pub mod jwt;
pub mod keys;
pub mod password;
pub mod queries;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; deliberately indistinguishable.
    #[error("Invalid credentials")]
    CredentialError,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
