//! set command - Set or create a leaf value
//!
//! # Type Rules
//!
//! - Existing leaf: the value is parsed as the leaf's type; a differing
//!   `--type` is an error (leaf types never change in place)
//! - Missing leaf: created with `--type`, default `word`, together with
//!   any missing parent keys

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::entry::Entry;
use crate::core::path::{get_by_path, join, place_at_path, segments};
use crate::core::types::{EntryType, Value};

pub fn set(ctx: &Context, path: &str, value: &str, ty: Option<EntryType>) -> Result<()> {
    let names = segments(path);
    let Some((name, parents)) = names.split_last() else {
        bail!("set needs a leaf path");
    };
    if let Some(ty) = ty {
        if ty.is_container() {
            bail!("'{}' is not a leaf type; use `hv mkdir` for keys", ty);
        }
    }

    let (manager, registry) = ctx.load()?;
    {
        let mut tree = registry.lock();
        let root = tree.root();
        match get_by_path(&tree, root, path) {
            Some(id) => {
                let current = tree
                    .entry_type(id)
                    .with_context(|| format!("no entry at '{}'", path))?;
                if current.is_container() {
                    bail!("'{}' is a key, not a leaf", path);
                }
                if let Some(requested) = ty.filter(|t| *t != current) {
                    bail!(
                        "'{}' is {}, not {}; remove it first to change its type",
                        path,
                        current,
                        requested
                    );
                }
                tree.set_value(id, Value::parse(current, value)?)?;
            }
            None => {
                let ty = ty.unwrap_or(EntryType::Word);
                let leaf = Entry::leaf(name, Value::parse(ty, value)?)?;
                place_at_path(&mut tree, root, &join(parents), leaf)?;
            }
        }
    }
    super::save(&manager, &registry)?;

    if !ctx.quiet {
        println!("{} = {}", path, value);
    }
    Ok(())
}
