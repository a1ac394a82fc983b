//! Access key service
//!
//! Provides high-level issuance, listing and eviction on top of a key store.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::access_key::{KeyRecord, KeyStore};
use crate::domain::issuance::{IssuanceConfig, IssuancePolicy, PolicyState};
use crate::domain::DomainError;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Access key service
///
/// The issuance policy lives behind the same mutex that serializes every
/// load-modify-save cycle on the store, so the cooldown check, the append and
/// the cooldown update form a single step and concurrent sweeps cannot drop
/// a freshly appended record.
#[derive(Debug)]
pub struct AccessKeyService {
    store: Arc<dyn KeyStore>,
    policy: Mutex<IssuancePolicy>,
}

impl AccessKeyService {
    /// Create a new service with the given issuance settings
    pub fn new(store: Arc<dyn KeyStore>, config: IssuanceConfig) -> Self {
        Self {
            store,
            policy: Mutex::new(IssuancePolicy::new(config)),
        }
    }

    /// Issue a new key now
    pub async fn issue(&self) -> Result<KeyRecord, DomainError> {
        self.issue_at(now_millis()).await
    }

    /// Issue a new key at the given instant
    ///
    /// The cooldown only starts once the record has been persisted; a failed
    /// save leaves the policy ready for the next attempt.
    pub async fn issue_at(&self, now: i64) -> Result<KeyRecord, DomainError> {
        let mut policy = self.policy.lock().await;

        if let Err(cooldown) = policy.check(now) {
            debug!(
                retry_after_ms = cooldown.retry_after_ms,
                "Key issuance rejected by cooldown"
            );
            return Err(cooldown.into());
        }

        let record = policy.prepare(now);

        self.store.append(record.clone()).await?;

        policy.mark_issued(now);

        info!(expiration_date = record.expiration_date, "Access key issued");
        Ok(record)
    }

    /// Read the full persisted collection, failing if it cannot be read
    pub async fn list(&self) -> Result<Vec<KeyRecord>, DomainError> {
        self.store.read().await
    }

    /// Evict records expired as of now
    pub async fn evict_expired(&self) -> Result<usize, DomainError> {
        self.evict_expired_at(now_millis()).await
    }

    /// Evict records whose expiration date is not after `now`
    pub async fn evict_expired_at(&self, now: i64) -> Result<usize, DomainError> {
        let _guard = self.policy.lock().await;

        let removed = self.store.evict_expired(now).await?;

        if removed > 0 {
            info!(removed, "Evicted expired access keys");
        } else {
            debug!("No expired access keys to evict");
        }

        Ok(removed)
    }

    /// Current cooldown state
    pub async fn policy_state(&self, now: i64) -> PolicyState {
        self.policy.lock().await.state(now)
    }
}
