//! Hivework - an embedded hierarchical versioned key/value registry
//!
//! A hive is a tree of named, typed entries persisted to a compact binary
//! file. Components keep their settings under their own Key and evolve the
//! layout through ordered, versioned migration steps.
//!
//! # Architecture
//!
//! - [`core`] - Entry types, the arena tree, path helpers, the binary
//!   codec and configuration
//! - [`hive`] - Named hive files: loading, atomic saving, locking, shared
//!   registries and lifecycle events
//! - [`schema`] - Versioned schemas and the migration driver
//! - [`settings`] - Built-in settings owners (database, HTTP server)
//! - [`cli`] - The `hv` command-line interface
//!
//! # Invariants
//!
//! 1. Sibling names are unique within every Key
//! 2. A leaf never changes type in place
//! 3. A failed load or migration never leaves a partially applied tree
//! 4. A hive file on disk is either the old or the new contents, never a mix
//!
//! # Example
//!
//! ```no_run
//! use hivework::hive::HiveManager;
//! use hivework::settings::Settings;
//!
//! let manager = HiveManager::new("data", "example");
//! let registry = manager.load_default()?;
//! let (settings, _) = Settings::open(&registry)?;
//! {
//!     let tree = registry.lock();
//!     println!("http port: {}", settings.sockets.http.get(&tree)?);
//! }
//! manager.save(&registry)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod core;
pub mod hive;
pub mod schema;
pub mod settings;
