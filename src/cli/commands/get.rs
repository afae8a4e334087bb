//! get command - Print one leaf value

use anyhow::{anyhow, bail, Result};

use crate::cli::Context;
use crate::core::path::get_by_path;

/// Print the value of the leaf at `path`.
pub fn get(ctx: &Context, path: &str) -> Result<()> {
    let (_, registry) = ctx.load()?;
    let tree = registry.lock();
    let id = get_by_path(&tree, tree.root(), path)
        .ok_or_else(|| anyhow!("no entry at '{}' in hive '{}'", path, ctx.hive))?;

    if tree.is_key(id) {
        bail!("'{}' is a key; use `hv show {}`", path, path);
    }
    println!("{}", tree.value(id)?);
    Ok(())
}
