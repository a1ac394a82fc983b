//! Storage factory for runtime key store selection

use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::config::StorageConfig;
use crate::domain::access_key::KeyStore;
use crate::domain::DomainError;

use super::file::JsonFileKeyStore;
use super::in_memory::InMemoryKeyStore;

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// Single JSON document on disk
    File,
    /// In-memory storage (for testing/development)
    InMemory,
}

impl FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            other => Err(DomainError::configuration(format!(
                "Unknown storage backend '{}'",
                other
            ))),
        }
    }
}

/// Factory for creating key store instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a key store based on the configuration
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn KeyStore>, DomainError> {
        let storage_type: StorageType = config.backend.parse()?;
        info!("Storage backend: {:?}", storage_type);

        let store: Arc<dyn KeyStore> = match storage_type {
            StorageType::File => {
                info!("Persisting keys to {}", config.path);
                Arc::new(JsonFileKeyStore::new(&config.path))
            }
            StorageType::InMemory => Arc::new(InMemoryKeyStore::new()),
        };

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_parsing() {
        assert_eq!("file".parse::<StorageType>().unwrap(), StorageType::File);
        assert_eq!("JSON".parse::<StorageType>().unwrap(), StorageType::File);
        assert_eq!(
            "in-memory".parse::<StorageType>().unwrap(),
            StorageType::InMemory
        );
        assert!("postgres".parse::<StorageType>().is_err());
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let config = StorageConfig {
            backend: "memory".to_string(),
            path: "unused.json".to_string(),
        };

        let store = StorageFactory::create(&config).unwrap();

        assert!(store.read().await.unwrap().is_empty());
    }

    #[test]
    fn test_create_unknown_backend_fails() {
        let config = StorageConfig {
            backend: "redis".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            StorageFactory::create(&config),
            Err(DomainError::Configuration { .. })
        ));
    }
}
