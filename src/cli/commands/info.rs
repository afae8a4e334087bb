//! info command - Show a hive's header

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::codec::{FORMAT_MAJOR, FORMAT_MINOR};

pub fn info(ctx: &Context) -> Result<()> {
    let manager = ctx.manager();
    let info = manager
        .inspect(&ctx.hive)
        .with_context(|| format!("cannot inspect hive '{}'", ctx.hive))?;
    let header = &info.header;

    println!("Hive: {}", info.name);
    println!("Path: {}", info.path.display());
    println!("Size: {} bytes", info.size);
    println!("Format: {}.{}", header.major, header.minor);
    println!("Creator: {}", header.creator);
    if header.minor != FORMAT_MINOR {
        println!(
            "Note: this build writes format {}.{}; the next save upgrades the file",
            FORMAT_MAJOR, FORMAT_MINOR
        );
    }
    if header.has_reserved_flags() {
        println!("Reserved flags: {:02x?}", header.reserved);
    }
    Ok(())
}
