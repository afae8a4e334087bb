//! list command - List hives in the data directory

use anyhow::Result;

use crate::cli::Context;

pub fn list(ctx: &Context) -> Result<()> {
    let manager = ctx.manager();
    let names = manager.list()?;

    if names.is_empty() {
        if !ctx.quiet {
            println!("No hives in {}", ctx.config.data_dir().display());
        }
        return Ok(());
    }
    for name in names {
        let marker = if name == ctx.hive { "*" } else { " " };
        println!("{} {}", marker, name);
    }
    Ok(())
}
