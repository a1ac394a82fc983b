//! JSON file key store
//!
//! The whole collection lives in a single pretty-printed JSON array which is
//! read and rewritten wholesale on every operation. Load-modify-save cycles
//! hold an exclusive lock on a sibling `.lock` file so several processes can
//! share one key file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use crate::domain::access_key::{retain_unexpired, KeyRecord, KeyStore};
use crate::domain::DomainError;

use super::lock::FileLock;

/// Key store backed by one JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileKeyStore {
    path: PathBuf,
}

impl JsonFileKeyStore {
    /// Creates a store at the given path; the file is created on first save
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "keys.json".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling_path(".tmp")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.sibling_path(".lock")
    }

    async fn lock(&self) -> Result<FileLock, DomainError> {
        FileLock::acquire_async(self.lock_path()).await
    }

    async fn write_and_replace(&self, temp_path: &Path, contents: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(temp_path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(temp_path, &self.path).await
    }
}

#[async_trait]
impl KeyStore for JsonFileKeyStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn read(&self) -> Result<Vec<KeyRecord>, DomainError> {
        let contents = fs::read(&self.path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                DomainError::storage(format!("Key file not found: {}", self.path.display()))
            } else {
                DomainError::storage(format!("Failed to read key file: {}", e))
            }
        })?;

        serde_json::from_slice(&contents)
            .map_err(|e| DomainError::storage(format!("Failed to parse key file: {}", e)))
    }

    async fn load(&self) -> Vec<KeyRecord> {
        if let Ok(false) = fs::try_exists(&self.path).await {
            debug!(path = %self.path.display(), "Key file missing, starting empty");
            return Vec::new();
        }

        match self.read().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Key file unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self, records), fields(path = %self.path.display(), count = records.len()))]
    async fn save(&self, records: Vec<KeyRecord>) -> Result<(), DomainError> {
        let serialized = serde_json::to_vec_pretty(&records)
            .map_err(|e| DomainError::storage(format!("Failed to serialize keys: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create key directory: {}", e))
            })?;
        }

        // Write to a sibling temp file, then rename over the target
        let temp_path = self.temp_path();
        if let Err(e) = self.write_and_replace(&temp_path, &serialized).await {
            match fs::remove_file(&temp_path).await {
                Err(cleanup) if cleanup.kind() != ErrorKind::NotFound => {
                    warn!(error = %cleanup, "Failed to remove temporary key file");
                }
                _ => {}
            }
            return Err(DomainError::storage(format!(
                "Failed to write key file: {}",
                e
            )));
        }

        debug!("Key file saved");
        Ok(())
    }

    async fn append(&self, record: KeyRecord) -> Result<(), DomainError> {
        let _lock = self.lock().await?;

        let mut records = self.load().await;
        records.push(record);
        self.save(records).await
    }

    async fn evict_expired(&self, now: i64) -> Result<usize, DomainError> {
        let _lock = self.lock().await?;

        let mut records = self.load().await;
        if records.is_empty() {
            return Ok(0);
        }

        let removed = retain_unexpired(&mut records, now);
        self.save(records).await?;

        Ok(removed)
    }
}
