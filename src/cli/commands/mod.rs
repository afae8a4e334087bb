//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the selected hive through the [`Context`]
//! 2. Reads or edits the tree under the registry lock
//! 3. Saves if it changed anything, then prints the result
//!
//! Handlers print to stdout; logs go to stderr.

mod completion;
mod config_cmd;
mod get;
mod info;
mod init;
mod list;
mod mkdir;
mod rm;
mod set;
mod show;

pub use completion::completion;
pub use get::get;
pub use info::info;
pub use init::init;
pub use list::list;
pub use mkdir::mkdir;
pub use rm::rm;
pub use set::set;
pub use show::show;

use anyhow::{bail, Context as _, Result};

use super::Context;
use crate::cli::args::{Command, ConfigAction};
use crate::hive::{HiveManager, Registry, SaveOutcome};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Show { path, json } => show::show(ctx, path.as_deref(), json),
        Command::Get { path } => get::get(ctx, &path),
        Command::Set { path, value, ty } => set::set(ctx, &path, &value, ty),
        Command::Mkdir { path } => mkdir::mkdir(ctx, &path),
        Command::Rm { path } => rm::rm(ctx, &path),
        Command::Info => info::info(ctx),
        Command::List => list::list(ctx),
        Command::Init => init::init(ctx),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Save after an edit, failing if a subscriber cancelled.
fn save(manager: &HiveManager, registry: &Registry) -> Result<()> {
    match manager
        .save(registry)
        .with_context(|| format!("failed to save hive '{}'", registry.name()))?
    {
        SaveOutcome::Saved { .. } => Ok(()),
        SaveOutcome::Cancelled => bail!("save of hive '{}' was cancelled", registry.name()),
    }
}
