//! show command - Print a subtree

use anyhow::{anyhow, Context as _, Result};

use crate::cli::Context;
use crate::core::path::get_by_path;

/// Print the subtree at `path` (the root when `None`).
pub fn show(ctx: &Context, path: Option<&str>, json: bool) -> Result<()> {
    let (_, registry) = ctx.load()?;
    let tree = registry.lock();
    let path = path.unwrap_or("");
    let id = get_by_path(&tree, tree.root(), path)
        .ok_or_else(|| anyhow!("no entry at '{}' in hive '{}'", path, ctx.hive))?;

    if json {
        let entry = tree
            .snapshot(id)
            .ok_or_else(|| anyhow!("entry at '{}' vanished", path))?;
        let text = serde_json::to_string_pretty(&entry.to_json())
            .context("failed to render JSON")?;
        println!("{}", text);
    } else {
        print!("{}", tree.pretty_print(id, 0));
    }
    Ok(())
}
