//! In-process credential store.
//!
//! Holds records in a map keyed by exact email. Counts lookups so callers
//! can assert which requests actually reached the store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CredentialStore, StoreError};
use crate::models::auth::CredentialRecord;

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
    lookups: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `record.email`.
    pub async fn insert(&self, record: CredentialRecord) {
        self.records
            .write()
            .await
            .insert(record.email.clone(), record);
    }

    /// Remove the record for `email`, returning it if present.
    pub async fn remove(&self, email: &str) -> Option<CredentialRecord> {
        self.records.write().await.remove(email)
    }

    /// Number of `lookup` calls made so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make subsequent lookups fail as if the backing pool timed out.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn lookup(&self, email: &str) -> Result<CredentialRecord, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(sqlx::Error::PoolTimedOut));
        }
        // Clone out so the guard is released before returning.
        let record = self.records.read().await.get(email).cloned();
        record.ok_or(StoreError::NotFound)
    }
}
