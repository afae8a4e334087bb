//! mkdir command - Create a key and its parents

use anyhow::{bail, Result};

use crate::cli::Context;
use crate::core::path::{ensure_key, get_by_path};

pub fn mkdir(ctx: &Context, path: &str) -> Result<()> {
    if crate::core::path::segments(path).is_empty() {
        bail!("mkdir needs a key path");
    }

    let (manager, registry) = ctx.load()?;
    let created = {
        let mut tree = registry.lock();
        let root = tree.root();
        let existed = get_by_path(&tree, root, path).is_some();
        ensure_key(&mut tree, root, path)?;
        !existed
    };

    if created {
        super::save(&manager, &registry)?;
    }
    if !ctx.quiet {
        if created {
            println!("Created {}", path);
        } else {
            println!("{} already exists", path);
        }
    }
    Ok(())
}
