//! Access Key Issuer
//!
//! Issues short random access keys over HTTP with:
//! - A global cooldown between successful issuances
//! - A persisted, expiring key store (JSON file or in-memory)
//! - Periodic background eviction of expired keys

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::access_key::AccessKeyService;
use infrastructure::storage::StorageFactory;

/// Create the access key service for the configured store and policy
///
/// Fails if the issuance settings are invalid.
pub fn create_access_key_service(config: &AppConfig) -> anyhow::Result<Arc<AccessKeyService>> {
    config.issuance.validate()?;
    let store = StorageFactory::create(&config.storage)?;

    Ok(Arc::new(AccessKeyService::new(
        store,
        config.issuance.clone(),
    )))
}

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    Ok(AppState::new(create_access_key_service(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issuance::PolicyState;

    #[tokio::test]
    async fn test_create_app_state_with_memory_backend() {
        let mut config = AppConfig::default();
        config.storage.backend = "memory".to_string();

        let state = create_app_state_with_config(&config).unwrap();

        assert!(state.access_key_service.list().await.unwrap().is_empty());
        assert_eq!(
            state.access_key_service.policy_state(0).await,
            PolicyState::Ready
        );
    }

    #[test]
    fn test_create_app_state_rejects_unknown_backend() {
        let mut config = AppConfig::default();
        config.storage.backend = "carrier-pigeon".to_string();

        assert!(create_app_state_with_config(&config).is_err());
    }

    #[test]
    fn test_create_access_key_service_rejects_inverted_key_lengths() {
        let mut config = AppConfig::default();
        config.storage.backend = "memory".to_string();
        config.issuance.key_min_length = 9;
        config.issuance.key_max_length = 8;

        let err = create_access_key_service(&config).unwrap_err();

        assert!(err.to_string().contains("Configuration error"), "{err}");
    }
}
