//! rm command - Remove an entry and its subtree

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::path::remove_at_path;

pub fn rm(ctx: &Context, path: &str) -> Result<()> {
    let (manager, registry) = ctx.load()?;
    let removed = {
        let mut tree = registry.lock();
        let root = tree.root();
        remove_at_path(&mut tree, root, path)
            .with_context(|| format!("cannot remove '{}' from hive '{}'", path, ctx.hive))?
    };
    super::save(&manager, &registry)?;

    if !ctx.quiet {
        println!("Removed {} ({} entries)", path, removed.count());
    }
    Ok(())
}
