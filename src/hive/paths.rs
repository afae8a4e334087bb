//! hive::paths
//!
//! Where hive files live.
//!
//! # Storage Layout
//!
//! Every hive is one set of files directly under the data directory:
//! - `<name>.hive` - The encoded tree
//! - `<name>.hive.tmp` - Staging file for atomic saves
//! - `<name>.lock` - Exclusive lock file held while saving
//!
//! No code outside this module builds these names.
//!
//! # Example
//!
//! ```
//! use hivework::core::types::HiveName;
//! use hivework::hive::paths::HivePaths;
//! use std::path::PathBuf;
//!
//! let paths = HivePaths::new("/var/lib/hivework");
//! let main = HiveName::new("main").unwrap();
//!
//! assert_eq!(paths.hive_path(&main), PathBuf::from("/var/lib/hivework/main.hive"));
//! assert_eq!(paths.lock_path(&main), PathBuf::from("/var/lib/hivework/main.lock"));
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::types::HiveName;

/// File extension of encoded hives.
pub const HIVE_EXTENSION: &str = "hive";

/// Path routing for one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HivePaths {
    data_dir: PathBuf,
}

impl HivePaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// `<data_dir>/<name>.hive`
    pub fn hive_path(&self, name: &HiveName) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", name.as_str(), HIVE_EXTENSION))
    }

    /// `<data_dir>/<name>.hive.tmp`
    pub fn temp_path(&self, name: &HiveName) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}.tmp", name.as_str(), HIVE_EXTENSION))
    }

    /// `<data_dir>/<name>.lock`
    pub fn lock_path(&self, name: &HiveName) -> PathBuf {
        self.data_dir.join(format!("{}.lock", name.as_str()))
    }

    /// Create the data directory if it does not exist.
    pub fn ensure_data_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }

    /// Names of all hives in the data directory, sorted.
    ///
    /// A missing data directory holds no hives. Files whose stem is not a
    /// valid hive name are skipped.
    pub fn hive_names(&self) -> io::Result<Vec<HiveName>> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(HIVE_EXTENSION) {
                continue;
            }
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| HiveName::new(s).ok())
            {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
