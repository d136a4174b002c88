//! PostgreSQL-backed credential store.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{CredentialStore, StoreError};
use crate::auth::queries;
use crate::models::auth::CredentialRecord;

/// Looks credentials up in the `users` table.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn lookup(&self, email: &str) -> Result<CredentialRecord, StoreError> {
        queries::find_credentials_by_email(&self.pool, email)
            .await?
            .ok_or(StoreError::NotFound)
    }
}
