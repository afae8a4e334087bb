//! core::path
//!
//! Path-based addressing into a [`Tree`].
//!
//! # Path Syntax
//!
//! Paths are `/`-delimited entry names, resolved from a starting Key:
//! - A leading `/` is ignored (`"/a/b"` equals `"a/b"`)
//! - The empty path (or `"/"`) names the starting Key itself
//! - Empty segments (`"a//b"`, `"a/"`) never resolve
//!
//! # Lookup vs Placement
//!
//! [`get_by_path`] is a lookup: anything missing yields `None`.
//! [`place_at_path`] creates missing intermediate Keys so it can attach an
//! entry, and is idempotent: running it again over an existing path creates
//! no new Keys. It checks the whole path before touching the tree, so a
//! failure never leaves half-created Keys behind.
//!
//! # Example
//!
//! ```
//! use hivework::core::entry::Entry;
//! use hivework::core::path::{get_by_path, place_at_path};
//! use hivework::core::tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.root();
//! place_at_path(&mut tree, root, "services/http", Entry::leaf("port", 7768i32).unwrap()).unwrap();
//!
//! let port = get_by_path(&tree, root, "services/http/port").unwrap();
//! assert_eq!(tree.int32(port).unwrap(), 7768);
//! assert!(get_by_path(&tree, root, "services/ftp").is_none());
//! ```

use super::entry::{Entry, EntryError};
use super::tree::{EntryId, Tree};
use super::types::EntryName;

/// Path delimiter.
pub const DELIMITER: char = '/';

/// Split a path into its raw segments.
///
/// The empty path and `"/"` yield no segments.
pub fn segments(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix(DELIMITER).unwrap_or(path);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split(DELIMITER).collect()
    }
}

/// Join segments into a path.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

/// Look up the entry at `path` below `from`.
///
/// Returns `None` if any segment is missing, if a non-terminal segment is a
/// leaf, or if the path contains an empty segment.
pub fn get_by_path(tree: &Tree, from: EntryId, path: &str) -> Option<EntryId> {
    if !tree.contains(from) {
        return None;
    }
    segments(path)
        .into_iter()
        .try_fold(from, |current, segment| {
            if segment.is_empty() {
                return None;
            }
            tree.get_named(current, segment)
        })
}

/// Validate every segment of a placement path.
fn parse_segments(path: &str) -> Result<Vec<EntryName>, EntryError> {
    segments(path)
        .into_iter()
        .map(|segment| {
            EntryName::new(segment).map_err(|e| EntryError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Walk as far as existing Keys go.
///
/// Returns the deepest existing Key and how many segments it consumed.
fn walk_existing(
    tree: &Tree,
    from: EntryId,
    path: &str,
    names: &[EntryName],
) -> Result<(EntryId, usize), EntryError> {
    let mut current = from;
    for (depth, name) in names.iter().enumerate() {
        match tree.get_named(current, name.as_str()) {
            Some(next) if tree.is_key(next) => current = next,
            Some(_) => {
                return Err(EntryError::NotAKey(format!(
                    "{} (segment '{}' of '{}')",
                    join(&names[..=depth]),
                    name,
                    path
                )))
            }
            None => return Ok((current, depth)),
        }
    }
    Ok((current, names.len()))
}

/// Attach `entry` as a child of the Key at `path`, creating missing Keys.
///
/// Every segment of `path` names a Key; the entry keeps its own name and
/// becomes the last child of the final Key.
///
/// # Errors
///
/// - [`EntryError::InvalidPath`] if a segment is not a valid entry name
/// - [`EntryError::NotAKey`] if a segment names an existing leaf
/// - [`EntryError::DuplicateName`] if the final Key already has a child
///   named like `entry`
///
/// On error the tree is unchanged.
pub fn place_at_path(
    tree: &mut Tree,
    from: EntryId,
    path: &str,
    entry: Entry,
) -> Result<EntryId, EntryError> {
    let names = parse_segments(path)?;
    tree.children(from)?;
    let (existing, depth) = walk_existing(tree, from, path, &names)?;

    if depth == names.len() {
        return tree.add(existing, entry);
    }

    // Build the missing chain detached, then attach it in one step.
    let entry_name = entry.name().clone();
    let mut chain = entry;
    for name in names[depth..].iter().rev() {
        chain = Entry::key(name.as_str())?.with_child(chain)?;
    }
    tree.add(existing, chain)?;

    let mut placed = existing;
    for name in names[depth..].iter().chain(std::iter::once(&entry_name)) {
        placed = tree
            .get_named(placed, name.as_str())
            .ok_or_else(|| EntryError::NotFound(name.to_string()))?;
    }
    Ok(placed)
}

/// Get the Key at `path`, creating it and any missing parents.
///
/// # Errors
///
/// Same as [`place_at_path`], except that an existing Key is returned
/// rather than reported as a duplicate.
pub fn ensure_key(tree: &mut Tree, from: EntryId, path: &str) -> Result<EntryId, EntryError> {
    let names = parse_segments(path)?;
    let Some((last, parents)) = names.split_last() else {
        tree.children(from)?;
        return Ok(from);
    };
    let parent_path = join(parents);
    if let Some(parent) = get_by_path(tree, from, &parent_path) {
        if let Some(existing) = tree.get_named(parent, last.as_str()) {
            if tree.is_key(existing) {
                return Ok(existing);
            }
            return Err(EntryError::NotAKey(join(&names)));
        }
    }
    place_at_path(tree, from, &parent_path, Entry::key(last.as_str())?)
}

/// Remove the entry at `path` and return it detached.
///
/// # Errors
///
/// - [`EntryError::InvalidPath`] for the empty path (the starting Key
///   cannot remove itself)
/// - [`EntryError::NotFound`] if nothing lives at `path`
pub fn remove_at_path(tree: &mut Tree, from: EntryId, path: &str) -> Result<Entry, EntryError> {
    let names = segments(path);
    let Some((last, parents)) = names.split_last() else {
        return Err(EntryError::InvalidPath {
            path: path.to_string(),
            reason: "cannot remove the starting key".into(),
        });
    };
    let parent = get_by_path(tree, from, &join(parents))
        .ok_or_else(|| EntryError::NotFound(path.to_string()))?;
    tree.remove_named(parent, last)
}
