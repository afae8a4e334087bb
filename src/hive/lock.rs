//! hive::lock
//!
//! Exclusive per-hive write lock.
//!
//! # Architecture
//!
//! Saving a hive holds an OS-level exclusive lock on `<name>.lock` next to
//! the hive file, so two processes never interleave a temp-file write and
//! rename for the same hive. Hives with different names lock independently.
//!
//! # Invariants
//!
//! - Lock is held for the whole temp-write, fsync and rename
//! - Lock is released on drop (RAII)
//! - Acquisition is non-blocking: a held lock fails fast

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;
use tracing::debug;

use super::paths::HivePaths;
use crate::core::types::HiveName;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("hive '{0}' is locked by another process")]
    AlreadyLocked(HiveName),

    /// Failed to create the lock file or its directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    /// Failed to release the lock.
    #[error("failed to release lock: {0}")]
    ReleaseFailed(String),
}

/// An exclusive lock on one hive, released when dropped.
#[derive(Debug)]
pub struct HiveLock {
    path: PathBuf,
    file: Option<File>,
}

impl HiveLock {
    /// Attempt to lock the hive `name`.
    ///
    /// Creates the data directory and lock file if needed.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(paths: &HivePaths, name: &HiveName) -> Result<Self, LockError> {
        paths.ensure_data_dir().map_err(|e| {
            LockError::CreateFailed(format!(
                "cannot create {}: {}",
                paths.data_dir().display(),
                e
            ))
        })?;

        let path = paths.lock_path(name);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(hive = %name, path = %path.display(), "acquired hive lock");
                Ok(Self {
                    path,
                    file: Some(file),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                debug!(hive = %name, "hive lock is held elsewhere");
                Err(LockError::AlreadyLocked(name.clone()))
            }
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock before the guard goes out of scope.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock()
                .map_err(|e| LockError::ReleaseFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for HiveLock {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, HivePaths, HiveName) {
        let temp = TempDir::new().expect("create temp dir");
        let paths = HivePaths::new(temp.path().join("data"));
        (temp, paths, HiveName::new("main").unwrap())
    }

    #[test]
    fn acquire_creates_data_dir_and_lock_file() {
        let (_temp, paths, name) = setup();
        assert!(!paths.data_dir().exists());

        let lock = HiveLock::acquire(&paths, &name).expect("acquire");
        assert!(lock.is_held());
        assert_eq!(lock.path(), paths.lock_path(&name));
        assert!(lock.path().exists());
    }

    #[test]
    fn second_acquire_fails() {
        let (_temp, paths, name) = setup();
        let _held = HiveLock::acquire(&paths, &name).expect("first acquire");

        assert!(matches!(
            HiveLock::acquire(&paths, &name),
            Err(LockError::AlreadyLocked(_))
        ));
    }

    #[test]
    fn different_hives_lock_independently() {
        let (_temp, paths, name) = setup();
        let other = HiveName::new("plugins").unwrap();
        let _a = HiveLock::acquire(&paths, &name).expect("main");
        let b = HiveLock::acquire(&paths, &other).expect("plugins");
        assert!(b.is_held());
    }

    #[test]
    fn released_on_drop_and_explicitly() {
        let (_temp, paths, name) = setup();
        {
            let _lock = HiveLock::acquire(&paths, &name).expect("first");
        }
        let mut lock = HiveLock::acquire(&paths, &name).expect("after drop");

        lock.release().expect("release");
        lock.release().expect("second release is a no-op");
        assert!(!lock.is_held());
        assert!(HiveLock::acquire(&paths, &name).is_ok());
    }
}
