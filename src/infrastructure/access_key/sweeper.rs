//! Background eviction of expired access keys

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::service::AccessKeyService;

/// Periodically evicts expired keys through an [`AccessKeyService`]
#[derive(Debug, Clone)]
pub struct EvictionSweeper {
    service: Arc<AccessKeyService>,
    interval: Duration,
}

/// Handle to a running sweeper task
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl EvictionSweeper {
    pub fn new(service: Arc<AccessKeyService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Runs a single sweep, logging instead of propagating failures
    ///
    /// Returns the number of evicted records, or `None` if the sweep failed.
    pub async fn run_once(&self) -> Option<usize> {
        match self.service.evict_expired().await {
            Ok(removed) => Some(removed),
            Err(e) => {
                error!(error = %e, "Eviction sweep failed, retrying next interval");
                None
            }
        }
    }

    /// Spawns the sweep loop on the current runtime
    ///
    /// The first sweep happens one full interval after spawning.
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        info!(interval_secs = self.interval.as_secs(), "Starting eviction sweeper");

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // The first tick fires immediately; consume it
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        info!("Eviction sweeper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.run_once().await;
                    }
                }
            }
        });

        SweeperHandle { shutdown, handle }
    }
}

impl SweeperHandle {
    /// Stops the sweep loop and waits for it to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);

        if let Err(e) = self.handle.await {
            error!(error = %e, "Eviction sweeper task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access_key::{KeyRecord, KeyStore};
    use crate::domain::issuance::IssuanceConfig;
    use crate::infrastructure::storage::InMemoryKeyStore;

    fn far_future() -> i64 {
        i64::MAX
    }

    fn setup(records: Vec<KeyRecord>) -> (Arc<InMemoryKeyStore>, Arc<AccessKeyService>) {
        let store = Arc::new(InMemoryKeyStore::with_records(records));
        let service = Arc::new(AccessKeyService::new(
            store.clone(),
            IssuanceConfig::default(),
        ));
        (store, service)
    }

    #[tokio::test]
    async fn test_run_once_evicts_expired() {
        let (store, service) = setup(vec![
            KeyRecord::new("EXPIRD", 1),
            KeyRecord::new("ACTIVE", far_future()),
        ]);
        let sweeper = EvictionSweeper::new(service, Duration::from_secs(3600));

        assert_eq!(sweeper.run_once().await, Some(1));
        assert_eq!(
            store.load().await,
            vec![KeyRecord::new("ACTIVE", far_future())]
        );
    }

    #[tokio::test]
    async fn test_run_once_swallows_storage_failure() {
        let (store, service) = setup(vec![KeyRecord::new("EXPIRD", 1)]);
        store.set_write_error(Some("read-only filesystem".to_string()));
        let sweeper = EvictionSweeper::new(service, Duration::from_secs(3600));

        assert_eq!(sweeper.run_once().await, None);
        assert_eq!(store.load().await.len(), 1);

        store.set_write_error(None);
        assert_eq!(sweeper.run_once().await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_sweeper_runs_on_interval() {
        let (store, service) = setup(vec![KeyRecord::new("EXPIRD", 1)]);
        let handle = EvictionSweeper::new(service, Duration::from_secs(3600)).spawn();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.load().await.len(), 1);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(store.load().await.is_empty());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_survives_failures() {
        let (store, service) = setup(vec![KeyRecord::new("EXPIRD", 1)]);
        store.set_write_error(Some("disk full".to_string()));
        let handle = EvictionSweeper::new(service, Duration::from_secs(60)).spawn();

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(store.load().await.len(), 1);

        store.set_write_error(None);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(store.load().await.is_empty());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let (_store, service) = setup(Vec::new());
        let handle = EvictionSweeper::new(service, Duration::from_secs(3600)).spawn();

        tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
            .await
            .expect("sweeper should stop promptly");
    }
}
