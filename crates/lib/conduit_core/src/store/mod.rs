//! Credential store adapters.
//!
//! The login flow only ever needs one read: "give me the stored password
//! material for this email". Everything that can answer that question
//! implements [`CredentialStore`].

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::auth::CredentialRecord;

pub use memory::MemoryCredentialStore;
pub use pg::PgCredentialStore;

/// Credential lookup errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No credentials for the given email")]
    NotFound,

    #[error("Credential store error: {0}")]
    Backend(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether the backing store was unreachable rather than failing a query.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::Backend(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            )
        )
    }
}

/// Read-only access to stored credentials.
///
/// Implementations run a single exact-match lookup and never retry;
/// retry policy, if any, belongs to the caller.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the credential record for `email`.
    async fn lookup(&self, email: &str) -> Result<CredentialRecord, StoreError>;
}
