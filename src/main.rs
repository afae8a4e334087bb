//! hv - command-line front end for hivework hives.

use std::process::ExitCode;

use anyhow::Context as _;
use hivework::cli::{self, Cli};
use hivework::core::config::{Config, ConfigLoadResult};

fn init_tracing(cli: &Cli, config: &Config) {
    // --quiet wins over everything, --debug over RUST_LOG, RUST_LOG over
    // the configured level.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let ConfigLoadResult { config, warnings } =
        match Config::load().context("failed to load configuration") {
            Ok(result) => result,
            Err(e) => {
                eprintln!("error: {:#}", e);
                return ExitCode::FAILURE;
            }
        };

    init_tracing(&cli, &config);
    for warning in &warnings {
        tracing::warn!(path = %warning.path.display(), "{}", warning.message);
    }
    if let Some(path) = config.loaded_from() {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    match cli::run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
