//! core::config
//!
//! Configuration loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. `$HIVEWORK_DATA_DIR` (data directory only)
//! 4. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$HIVEWORK_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/hivework/config.toml`
//! 3. `~/.hivework/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use hivework::core::config::Config;
//!
//! let config = Config::load().unwrap().config;
//! println!("hives live in {}", config.data_dir().display());
//! println!("default hive: {}", config.default_hive());
//! ```

pub mod schema;

pub use schema::HiveworkConfig;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::types::HiveName;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "HIVEWORK_CONFIG";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "HIVEWORK_DATA_DIR";

/// Data directory used when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Tracing level used when nothing else is configured.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
}

/// Resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values read from the config file
    pub file: HiveworkConfig,
    /// `--data-dir` or `$HIVEWORK_DATA_DIR`, if given
    data_dir_override: Option<PathBuf>,
    /// Path the file was loaded from
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// fails validation. A missing file is not an error.
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();
        let (file, loaded_from) = Self::locate(&mut warnings)?;
        file.validate()?;

        let data_dir_override = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(ConfigLoadResult {
            config: Config {
                file,
                data_dir_override,
                loaded_from,
            },
            warnings,
        })
    }

    /// Load configuration from one explicit file, ignoring the environment.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let file = Self::read_config(path)?;
        file.validate()?;
        Ok(Config {
            file,
            data_dir_override: None,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    fn locate(
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(HiveworkConfig, Option<PathBuf>), ConfigError> {
        // 1. $HIVEWORK_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
            warnings.push(ConfigWarning {
                message: format!("{} points at a missing file, ignoring it", CONFIG_ENV),
                path,
            });
        }

        // 2. $XDG_CONFIG_HOME/hivework/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("hivework/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. ~/.hivework/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".hivework/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((HiveworkConfig::default(), None))
    }

    fn read_config(path: &Path) -> Result<HiveworkConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Canonical config path, `~/.hivework/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".hivework/config.toml"))
    }

    /// Write the config to its canonical location atomically.
    pub fn write_global(config: &HiveworkConfig) -> Result<PathBuf, ConfigError> {
        let path = Self::global_config_path()?;
        Self::write_to(&path, config)?;
        Ok(path)
    }

    /// Write a config file atomically (temp file, fsync, rename).
    pub fn write_to(path: &Path, config: &HiveworkConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(contents.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Replace the data directory, as the `--data-dir` flag does.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir_override = Some(dir.into());
        self
    }

    /// File `hv config set` writes: the one loaded, else the canonical path.
    pub fn write_target(&self) -> Result<PathBuf, ConfigError> {
        match &self.loaded_from {
            Some(path) => Ok(path.clone()),
            None => Self::global_config_path(),
        }
    }

    // =========================================================================
    // Accessors with defaults applied
    // =========================================================================

    /// Directory holding hive files.
    ///
    /// `$HIVEWORK_DATA_DIR` beats the file; defaults to `data`.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir_override {
            return dir.clone();
        }
        PathBuf::from(self.file.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    /// Hive opened when none is named. Defaults to `main`.
    pub fn default_hive(&self) -> HiveName {
        self.file
            .default_hive
            .as_deref()
            .and_then(|name| HiveName::new(name).ok())
            .unwrap_or_else(HiveName::default_hive)
    }

    /// Header signature for written hives.
    pub fn creator(&self) -> String {
        self.file
            .creator
            .clone()
            .unwrap_or_else(|| format!("hivework {}", env!("CARGO_PKG_VERSION")))
    }

    /// Default tracing level. Defaults to `warn`.
    pub fn log_level(&self) -> &str {
        self.file.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}
