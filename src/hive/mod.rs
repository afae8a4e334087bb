//! hive
//!
//! Binding between the codec and files on disk.
//!
//! # Overview
//!
//! A [`HiveManager`] owns one data directory. Each hive in it is an
//! independent tree stored as `<name>.hive`; the configured default hive
//! is the process-wide store.
//!
//! # Loading
//!
//! [`HiveManager::load`] decodes the file if it exists, or starts from an
//! empty tree on first run. Either way it returns a [`Registry`] and then
//! notifies [`HiveEvent::Loaded`]. [`HiveManager::reload`] swaps a fresh
//! decode into an existing registry only once decoding has fully succeeded.
//!
//! # Saving
//!
//! Saves always rewrite the whole file:
//! 1. Notify [`HiveEvent::Saving`]; a subscriber may cancel
//! 2. Take the per-hive [`HiveLock`]
//! 3. Encode the tree under the registry lock
//! 4. Write `<name>.hive.tmp`, fsync, rename over `<name>.hive`
//!
//! A failed save leaves the previous file in place.
//!
//! # Example
//!
//! ```
//! use hivework::core::entry::Entry;
//! use hivework::core::path::place_at_path;
//! use hivework::core::types::HiveName;
//! use hivework::hive::HiveManager;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let manager = HiveManager::new(dir.path(), "doc-test");
//! let main = HiveName::new("main").unwrap();
//!
//! let registry = manager.load(&main).unwrap();
//! {
//!     let mut tree = registry.lock();
//!     let root = tree.root();
//!     place_at_path(&mut tree, root, "database", Entry::leaf("dbname", "harbinger").unwrap()).unwrap();
//! }
//! manager.save(&registry).unwrap();
//!
//! let again = manager.load(&main).unwrap();
//! assert_eq!(*again.lock(), *registry.lock());
//! ```

pub mod events;
pub mod lock;
pub mod paths;
pub mod registry;

pub use events::{Dispatch, Flow, HiveEvent, SubscriptionId, Subscribers};
pub use lock::{HiveLock, LockError};
pub use paths::HivePaths;
pub use registry::Registry;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::codec::{self, CodecError, CompatibilityWarning, DecodedHive, HiveHeader};
use crate::core::config::Config;
use crate::core::tree::Tree;
use crate::core::types::{HiveName, TypeError};

/// Errors from hive storage.
#[derive(Debug, Error)]
pub enum HiveError {
    #[error("failed to read hive file '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write hive file '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("cannot decode hive file '{path}': {source}")]
    Codec { path: PathBuf, source: CodecError },

    #[error("hive '{0}' is being saved by another process")]
    Locked(HiveName),

    #[error(transparent)]
    Lock(LockError),

    #[error(transparent)]
    InvalidName(#[from] TypeError),

    #[error("hive '{0}' does not exist")]
    NotFound(HiveName),
}

impl From<LockError> for HiveError {
    fn from(e: LockError) -> Self {
        match e {
            LockError::AlreadyLocked(name) => HiveError::Locked(name),
            other => HiveError::Lock(other),
        }
    }
}

/// Result of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file was rewritten.
    Saved {
        path: PathBuf,
        bytes: usize,
        entries: usize,
    },
    /// A `Saving` subscriber cancelled; nothing was written.
    Cancelled,
}

/// Header-level facts about a stored hive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiveInfo {
    pub name: HiveName,
    pub path: PathBuf,
    pub size: u64,
    pub header: HiveHeader,
}

/// Loads and saves hives in one data directory.
#[derive(Debug)]
pub struct HiveManager {
    paths: HivePaths,
    creator: String,
    default_hive: HiveName,
    subscribers: Subscribers,
}

impl HiveManager {
    /// Manager for `data_dir`, signing written files with `creator`.
    pub fn new(data_dir: impl Into<PathBuf>, creator: impl Into<String>) -> Self {
        Self {
            paths: HivePaths::new(data_dir),
            creator: creator.into(),
            default_hive: HiveName::default_hive(),
            subscribers: Subscribers::new(),
        }
    }

    /// Manager using the configured data directory, creator and default hive.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_dir(), config.creator()).with_default_hive(config.default_hive())
    }

    pub fn with_default_hive(mut self, name: HiveName) -> Self {
        self.default_hive = name;
        self
    }

    pub fn paths(&self) -> &HivePaths {
        &self.paths
    }

    pub fn default_hive(&self) -> &HiveName {
        &self.default_hive
    }

    /// Register an event handler; see [`events`].
    pub fn subscribe<F>(&mut self, priority: i32, handler: F) -> SubscriptionId
    where
        F: Fn(&HiveEvent<'_>) -> Flow + Send + Sync + 'static,
    {
        self.subscribers.subscribe(priority, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load the default hive.
    pub fn load_default(&self) -> Result<Registry, HiveError> {
        self.load(&self.default_hive)
    }

    /// Load a hive by unvalidated name.
    pub fn open(&self, name: &str) -> Result<Registry, HiveError> {
        self.load(&HiveName::new(name)?)
    }

    /// Load `name`, or start it empty if no file exists yet.
    ///
    /// # Errors
    ///
    /// - [`HiveError::Read`] if the file exists but cannot be read
    /// - [`HiveError::Codec`] if it cannot be decoded
    pub fn load(&self, name: &HiveName) -> Result<Registry, HiveError> {
        let (tree, created) = match self.read(name)? {
            Some(decoded) => (decoded.tree, false),
            None => {
                info!(hive = %name, "no hive file yet, starting empty");
                (Tree::new(), true)
            }
        };
        let registry = Registry::new(name.clone(), tree);
        self.subscribers.notify(&HiveEvent::Loaded {
            registry: &registry,
            created,
        });
        Ok(registry)
    }

    /// Replace `registry`'s tree with the current file contents.
    ///
    /// Decoding completes before anything is swapped, so on error the
    /// in-memory tree is exactly as it was.
    ///
    /// # Errors
    ///
    /// [`HiveError::NotFound`] if the hive has no file, otherwise as
    /// [`load`](Self::load).
    pub fn reload(&self, registry: &Registry) -> Result<Vec<CompatibilityWarning>, HiveError> {
        let name = registry.name();
        let decoded = self
            .read(name)?
            .ok_or_else(|| HiveError::NotFound(name.clone()))?;
        registry.replace(decoded.tree);
        self.subscribers.notify(&HiveEvent::Loaded {
            registry,
            created: false,
        });
        Ok(decoded.warnings)
    }

    /// Read and decode a hive file; `None` if it does not exist.
    fn read(&self, name: &HiveName) -> Result<Option<DecodedHive>, HiveError> {
        let path = self.paths.hive_path(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(HiveError::Read { path, source: e }),
        };

        let decoded = codec::decode_hive(&bytes).map_err(|source| HiveError::Codec {
            path: path.clone(),
            source,
        })?;
        for warning in &decoded.warnings {
            warn!(hive = %name, path = %path.display(), "{}", warning.message);
        }
        info!(
            hive = %name,
            path = %path.display(),
            bytes = bytes.len(),
            entries = decoded.tree.len(),
            creator = %decoded.header.creator,
            "loaded hive"
        );
        Ok(Some(decoded))
    }

    // =========================================================================
    // Saving
    // =========================================================================

    /// Save `registry` back to the hive it was loaded from.
    pub fn save(&self, registry: &Registry) -> Result<SaveOutcome, HiveError> {
        self.save_as(registry, registry.name())
    }

    /// Save `registry` as hive `target`.
    ///
    /// # Errors
    ///
    /// - [`HiveError::Locked`] if another process is saving `target`
    /// - [`HiveError::Codec`] if the tree is too deep to encode
    /// - [`HiveError::Write`] if the file cannot be written
    pub fn save_as(&self, registry: &Registry, target: &HiveName) -> Result<SaveOutcome, HiveError> {
        let dispatch = self.subscribers.notify(&HiveEvent::Saving { registry, target });
        if let Dispatch::Cancelled { .. } = dispatch {
            info!(hive = %target, "save cancelled by subscriber");
            return Ok(SaveOutcome::Cancelled);
        }

        let mut lock = HiveLock::acquire(&self.paths, target)?;
        let path = self.paths.hive_path(target);

        let (bytes, entries) = {
            let tree = registry.lock();
            let bytes = codec::encode_hive(&tree, &self.creator).map_err(|source| {
                HiveError::Codec {
                    path: path.clone(),
                    source,
                }
            })?;
            (bytes, tree.len())
        };

        let temp_path = self.paths.temp_path(target);
        if let Err(e) = write_atomic(&temp_path, &path, &bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        lock.release()?;

        info!(
            hive = %target,
            path = %path.display(),
            bytes = bytes.len(),
            entries,
            "saved hive"
        );
        Ok(SaveOutcome::Saved {
            path,
            bytes: bytes.len(),
            entries,
        })
    }

    // =========================================================================
    // Directory operations
    // =========================================================================

    pub fn exists(&self, name: &HiveName) -> bool {
        self.paths.hive_path(name).is_file()
    }

    /// Every hive in the data directory, sorted by name.
    pub fn list(&self) -> Result<Vec<HiveName>, HiveError> {
        self.paths.hive_names().map_err(|e| HiveError::Read {
            path: self.paths.data_dir().to_path_buf(),
            source: e,
        })
    }

    /// Delete a hive's file. Returns false if it did not exist.
    pub fn delete(&self, name: &HiveName) -> Result<bool, HiveError> {
        let mut lock = HiveLock::acquire(&self.paths, name)?;
        let path = self.paths.hive_path(name);
        let removed = match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(HiveError::Write { path, source: e }),
        };
        lock.release()?;
        let _ = fs::remove_file(lock.path());

        if removed {
            info!(hive = %name, path = %path.display(), "deleted hive");
        }
        Ok(removed)
    }

    /// Read only the header of a stored hive.
    pub fn inspect(&self, name: &HiveName) -> Result<HiveInfo, HiveError> {
        let path = self.paths.hive_path(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(HiveError::NotFound(name.clone()))
            }
            Err(e) => return Err(HiveError::Read { path, source: e }),
        };
        let header = codec::read_header(&bytes).map_err(|source| HiveError::Codec {
            path: path.clone(),
            source,
        })?;
        Ok(HiveInfo {
            name: name.clone(),
            path,
            size: bytes.len() as u64,
            header,
        })
    }
}

/// Write `bytes` to `temp`, fsync, rename over `path`, then fsync the
/// directory so the rename itself is durable.
fn write_atomic(temp: &Path, path: &Path, bytes: &[u8]) -> Result<(), HiveError> {
    let mut file = fs::File::create(temp).map_err(write_error(temp))?;
    file.write_all(bytes).map_err(write_error(temp))?;
    file.sync_all().map_err(write_error(temp))?;
    drop(file);

    fs::rename(temp, path).map_err(write_error(path))?;
    if let Some(dir) = path.parent() {
        sync_dir(dir).map_err(write_error(dir))?;
    }
    debug!(path = %path.display(), "renamed staged hive into place");
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    // An empty parent means the current directory.
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    fs::File::open(dir)?.sync_all()
}

// Directories cannot be opened for syncing on other platforms.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

fn write_error(path: &Path) -> impl FnOnce(io::Error) -> HiveError {
    let path = path.to_path_buf();
    move |source| HiveError::Write { path, source }
}
