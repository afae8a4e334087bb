//! config command - Get, set, or list configuration values

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::config::{Config, HiveworkConfig};

/// Keys understood by `hv config`, in listing order.
const KEYS: &[&str] = &["data_dir", "default_hive", "creator", "log_level"];

/// Effective value of `key`, with defaults and overrides applied.
fn effective(config: &Config, key: &str) -> Result<String> {
    Ok(match key {
        "data_dir" => config.data_dir().display().to_string(),
        "default_hive" => config.default_hive().to_string(),
        "creator" => config.creator(),
        "log_level" => config.log_level().to_string(),
        _ => bail!("Unknown configuration key: {}", key),
    })
}

fn slot<'a>(file: &'a mut HiveworkConfig, key: &str) -> Result<&'a mut Option<String>> {
    Ok(match key {
        "data_dir" => &mut file.data_dir,
        "default_hive" => &mut file.default_hive,
        "creator" => &mut file.creator,
        "log_level" => &mut file.log_level,
        _ => bail!("Unknown configuration key: {}", key),
    })
}

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    println!("{}", effective(&ctx.config, key)?);
    Ok(())
}

/// Set a configuration value in the config file.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut file = ctx.config.file.clone();
    *slot(&mut file, key)? = Some(value.to_string());

    let path = match ctx.config.loaded_from() {
        Some(path) => {
            Config::write_to(path, &file).context("Failed to write config")?;
            path.to_path_buf()
        }
        None => Config::write_global(&file).context("Failed to write config")?,
    };

    if !ctx.quiet {
        println!("Set {} = {} in {}", key, value, path.display());
    }
    Ok(())
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    match ctx.config.loaded_from() {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!(
            "# No config file; `hv config set` writes {}",
            ctx.config.write_target()?.display()
        ),
    }
    for key in KEYS {
        println!("{} = {}", key, effective(&ctx.config, key)?);
    }
    Ok(())
}
