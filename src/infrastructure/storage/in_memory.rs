//! In-memory key store implementation

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::access_key::{KeyRecord, KeyStore};
use crate::domain::DomainError;

/// Thread-safe in-memory key store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryKeyStore {
    records: RwLock<Vec<KeyRecord>>,
    read_error: RwLock<Option<String>>,
    write_error: RwLock<Option<String>>,
}

impl InMemoryKeyStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records
    pub fn with_records(records: Vec<KeyRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::default()
        }
    }

    /// Makes every subsequent read fail with the given message
    pub fn with_read_error(self, message: impl Into<String>) -> Self {
        self.set_read_error(Some(message.into()));
        self
    }

    /// Makes every subsequent save fail with the given message
    pub fn with_write_error(self, message: impl Into<String>) -> Self {
        self.set_write_error(Some(message.into()));
        self
    }

    pub fn set_read_error(&self, message: Option<String>) {
        if let Ok(mut slot) = self.read_error.write() {
            *slot = message;
        }
    }

    pub fn set_write_error(&self, message: Option<String>) {
        if let Ok(mut slot) = self.write_error.write() {
            *slot = message;
        }
    }

    fn injected(slot: &RwLock<Option<String>>) -> Result<(), DomainError> {
        let error = slot
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        match &*error {
            Some(message) => Err(DomainError::storage(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn read(&self) -> Result<Vec<KeyRecord>, DomainError> {
        Self::injected(&self.read_error)?;

        let records = self
            .records
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.clone())
    }

    async fn save(&self, records: Vec<KeyRecord>) -> Result<(), DomainError> {
        Self::injected(&self.write_error)?;

        let mut stored = self
            .records
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        *stored = records;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load() {
        let store = InMemoryKeyStore::new();
        let records = vec![KeyRecord::new("AAAAAA", 1), KeyRecord::new("BBBBBB", 2)];

        store.save(records.clone()).await.unwrap();

        assert_eq!(store.load().await, records);
    }

    #[tokio::test]
    async fn test_read_error_loads_empty() {
        let store = InMemoryKeyStore::with_records(vec![KeyRecord::new("AAAAAA", 1)])
            .with_read_error("simulated corruption");

        assert!(store.read().await.is_err());
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_error_keeps_previous_state() {
        let store = InMemoryKeyStore::with_records(vec![KeyRecord::new("AAAAAA", 1)])
            .with_write_error("disk full");

        let result = store.save(Vec::new()).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert_eq!(store.load().await.len(), 1);

        store.set_write_error(None);
        store.save(Vec::new()).await.unwrap();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_evict_expired_failure_propagates() {
        let store = InMemoryKeyStore::with_records(vec![KeyRecord::new("AAAAAA", 1)])
            .with_write_error("read-only");

        assert!(store.evict_expired(10).await.is_err());
        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_evict_expired_empty_store_skips_write() {
        // A failing writer would surface an error if save were called
        let store = InMemoryKeyStore::new().with_write_error("read-only");

        assert_eq!(store.evict_expired(10).await.unwrap(), 0);
    }
}
