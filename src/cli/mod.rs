//! cli
//!
//! Command-line interface for hivework.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve config and flags into a [`Context`]
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers load a hive through
//! [`crate::hive::HiveManager`], work on it under the registry lock and
//! save it back; all format and tree rules live in the library.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::core::types::HiveName;
use crate::hive::{HiveManager, Registry};

/// Everything a command needs, resolved from config and flags.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded config with `--data-dir` applied.
    pub config: Config,
    /// Hive selected with `--hive`, else the configured default.
    pub hive: HiveName,
    pub debug: bool,
    pub quiet: bool,
}

impl Context {
    /// Apply CLI flags on top of loaded config.
    pub fn new(cli: &Cli, config: Config) -> Result<Self> {
        let config = match &cli.data_dir {
            Some(dir) => config.with_data_dir(dir),
            None => config,
        };
        let hive = match &cli.hive {
            Some(name) => HiveName::new(name.as_str())
                .with_context(|| format!("invalid --hive '{}'", name))?,
            None => config.default_hive(),
        };
        Ok(Self {
            config,
            hive,
            debug: cli.debug,
            quiet: cli.quiet,
        })
    }

    pub fn manager(&self) -> HiveManager {
        HiveManager::from_config(&self.config).with_default_hive(self.hive.clone())
    }

    /// Load the selected hive.
    pub fn load(&self) -> Result<(HiveManager, Registry)> {
        let manager = self.manager();
        let registry = manager
            .load(&self.hive)
            .with_context(|| format!("failed to load hive '{}'", self.hive))?;
        Ok((manager, registry))
    }
}

/// Run a parsed command line with already-loaded config.
///
/// Called from `main.rs` after logging is set up.
pub fn run(cli: Cli, config: Config) -> Result<()> {
    let ctx = Context::new(&cli, config)?;
    commands::dispatch(cli.command, &ctx)
}
