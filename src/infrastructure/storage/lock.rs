//! Advisory file locks shared between processes

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use tracing::warn;

use crate::domain::DomainError;

/// Exclusive advisory lock held on a lock file until dropped
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Blocks until the exclusive lock on `path` is acquired
    ///
    /// The lock file and its parent directories are created if missing. Call
    /// from a blocking context.
    pub fn acquire(path: &Path) -> Result<Self, DomainError> {
        let lock_err =
            |e: std::io::Error| DomainError::storage(format!("Failed to lock key file: {}", e));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(lock_err)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(lock_err)?;

        FileExt::lock_exclusive(&file).map_err(lock_err)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Acquires the lock on a blocking thread
    pub async fn acquire_async(path: PathBuf) -> Result<Self, DomainError> {
        tokio::task::spawn_blocking(move || Self::acquire(&path))
            .await
            .map_err(|e| DomainError::internal(format!("Lock task failed: {}", e)))?
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), error = %e, "Failed to release key file lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_creates_lock_file_and_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/keys.json.lock");

        let _lock = FileLock::acquire(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_lock_is_exclusive_until_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.json.lock");
        let released = Arc::new(AtomicBool::new(false));

        let first = FileLock::acquire(&path).unwrap();

        let waiter = {
            let path = path.clone();
            let released = released.clone();
            std::thread::spawn(move || {
                let _second = FileLock::acquire(&path).unwrap();
                released.load(Ordering::SeqCst)
            })
        };

        std::thread::sleep(Duration::from_millis(100));
        released.store(true, Ordering::SeqCst);
        drop(first);

        assert!(waiter.join().unwrap(), "second lock acquired while first was held");
    }

    #[tokio::test]
    async fn test_acquire_async() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.json.lock");

        let lock = FileLock::acquire_async(path.clone()).await.unwrap();
        drop(lock);

        FileLock::acquire_async(path).await.unwrap();
    }
}
