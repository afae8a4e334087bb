//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--data-dir <path>`: Directory holding hive files
//! - `--hive <name>`: Hive to operate on (default from config, else `main`)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output, no logging

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::EntryType;

/// hv - inspect and edit hivework registry hives
#[derive(Parser, Debug)]
#[command(name = "hv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding hive files (overrides config and HIVEWORK_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Hive to operate on
    #[arg(long, global = true, value_name = "NAME")]
    pub hive: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub debug: bool,

    /// Minimal output; disables logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a subtree
    #[command(
        name = "show",
        long_about = "Print a subtree of the hive.\n\n\
            Keys are listed with their children indented below them; leaves \
            show their value in brackets. With no path the whole hive is shown.",
        after_help = "\
EXAMPLES:
    # The whole default hive
    hv show

    # One subtree as JSON
    hv show HKS/sockets --json"
    )]
    Show {
        /// Path of the subtree (default: the root)
        path: Option<String>,

        /// Print JSON instead of the indented tree
        #[arg(long)]
        json: bool,
    },

    /// Print one leaf value
    #[command(
        name = "get",
        after_help = "\
EXAMPLES:
    hv get HKS/database/dbname"
    )]
    Get {
        /// Path of the leaf
        path: String,
    },

    /// Set a leaf value, creating the leaf and its parents if needed
    #[command(
        name = "set",
        long_about = "Set a leaf value.\n\n\
            An existing leaf keeps its type: the value is parsed as that type and \
            --type, if given, must agree. A missing leaf is created with --type \
            (default: word), along with any missing parent keys.",
        after_help = "\
EXAMPLES:
    # Change an existing Int32
    hv set HKS/sockets/http 8080

    # Create a new boolean leaf
    hv set plugins/chat/enabled true --type bool"
    )]
    Set {
        /// Path of the leaf
        path: String,

        /// New value
        value: String,

        /// Leaf type: word, int16, int32, int64, bool
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        ty: Option<EntryType>,
    },

    /// Create a key and any missing parents
    #[command(name = "mkdir")]
    Mkdir {
        /// Path of the key
        path: String,
    },

    /// Remove an entry and everything below it
    #[command(name = "rm")]
    Rm {
        /// Path of the entry
        path: String,
    },

    /// Show the header of the selected hive
    #[command(name = "info")]
    Info,

    /// List hives in the data directory
    #[command(name = "list")]
    List,

    /// Initialize or upgrade the built-in settings and save
    #[command(
        name = "init",
        long_about = "Open every built-in settings schema in the hive.\n\n\
            Missing settings are created with their defaults and older ones are \
            upgraded in place; stored values are never reset. The hive is saved \
            afterwards if anything changed."
    )]
    Init,

    /// Get, set, or list configuration values
    #[command(
        name = "config",
        long_about = "View or modify hivework configuration.\n\n\
            Values are read from the first config file found ($HIVEWORK_CONFIG, \
            $XDG_CONFIG_HOME/hivework/config.toml, ~/.hivework/config.toml). \
            `set` writes back to that file, or to ~/.hivework/config.toml if \
            there is none.",
        after_help = "\
EXAMPLES:
    # Show effective values
    hv config list

    # Get a specific value
    hv config get data_dir

    # Set a value
    hv config set default_hive staging"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    hv completion bash > ~/.local/share/bash-completion/completions/hv
    hv completion zsh > ~/.zfunc/_hv
    hv completion fish > ~/.config/fish/completions/hv.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_set_with_type() {
        let cli = Cli::try_parse_from(["hv", "--hive", "x", "set", "a/b", "7", "--type", "int16"])
            .unwrap();
        assert_eq!(cli.hive.as_deref(), Some("x"));
        match cli.command {
            Command::Set { path, value, ty } => {
                assert_eq!(path, "a/b");
                assert_eq!(value, "7");
                assert_eq!(ty, Some(EntryType::Int16));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn unknown_type_rejected() {
        assert!(Cli::try_parse_from(["hv", "set", "a", "1", "--type", "float"]).is_err());
    }

    #[test]
    fn parses_config_set() {
        let cli = Cli::try_parse_from(["hv", "config", "set", "creator", "node-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Set { ref key, ref value }
            } if key == "creator" && value == "node-1"
        ));
    }

    #[test]
    fn debug_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["hv", "--debug", "--quiet", "list"]).is_err());
    }
}
