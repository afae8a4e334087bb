//! init command - Open the built-in settings schemas
//!
//! Initializes missing settings, upgrades old ones, and saves only if
//! something changed.

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::settings::Settings;

pub fn init(ctx: &Context) -> Result<()> {
    let (manager, registry) = ctx.load()?;
    let (_, reports) = Settings::open(&registry)
        .with_context(|| format!("cannot open settings in hive '{}'", ctx.hive))?;

    let changed = reports.iter().any(|r| r.outcome.changed());
    if changed || !manager.exists(&ctx.hive) {
        super::save(&manager, &registry)?;
    }

    if !ctx.quiet {
        for report in &reports {
            println!("{:<28} {}", report.path, report.outcome);
        }
    }
    Ok(())
}
