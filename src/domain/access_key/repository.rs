//! Key store trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::DomainError;

use super::entity::KeyRecord;

/// Durable, ordered collection of issued key records
///
/// Every call round-trips through the backing medium; implementations must not
/// cache records between calls. `save` replaces the whole collection and must
/// never expose a partially written collection to `read`.
#[async_trait]
pub trait KeyStore: Send + Sync + Debug {
    /// Reads the persisted collection, surfacing read and parse failures
    async fn read(&self) -> Result<Vec<KeyRecord>, DomainError>;

    /// Replaces the persisted collection
    async fn save(&self, records: Vec<KeyRecord>) -> Result<(), DomainError>;

    /// Reads the persisted collection, treating any failure as an empty store
    async fn load(&self) -> Vec<KeyRecord> {
        match self.read().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Key store unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Appends one record to the persisted collection
    ///
    /// Implementations shared between processes hold an exclusive lock across
    /// the load and the save.
    async fn append(&self, record: KeyRecord) -> Result<(), DomainError> {
        let mut records = self.load().await;
        records.push(record);
        self.save(records).await
    }

    /// Removes records whose expiration date is not after `now`
    ///
    /// Returns the number of removed records. Does not write when the store is
    /// empty.
    async fn evict_expired(&self, now: i64) -> Result<usize, DomainError> {
        let mut records = self.load().await;

        if records.is_empty() {
            return Ok(0);
        }

        let removed = retain_unexpired(&mut records, now);
        self.save(records).await?;

        Ok(removed)
    }
}

/// Drops records expired as of `now`, preserving order; returns how many were dropped
pub fn retain_unexpired(records: &mut Vec<KeyRecord>, now: i64) -> usize {
    let before = records.len();
    records.retain(|record| !record.is_expired_at(now));
    let removed = before - records.len();

    debug!(removed, retained = records.len(), "Evicting expired keys");
    removed
}
