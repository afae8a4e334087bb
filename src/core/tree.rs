//! core::tree
//!
//! The attached registry tree.
//!
//! # Architecture
//!
//! Nodes live in an arena owned by [`Tree`] and are addressed by
//! [`EntryId`]. A Key owns its children through the id list it stores;
//! a child's `parent` is a plain index back into the arena and is only
//! used to rebuild paths, never to walk down.
//!
//! Ids carry a generation, so an id kept after its entry was removed
//! resolves to nothing instead of to whatever later reused the slot.
//!
//! # Invariants
//!
//! - Exactly one root; its parent is always `None`
//! - Sibling names are unique within a Key
//! - Children keep insertion order
//! - A failed operation leaves the tree unchanged
//!
//! # Example
//!
//! ```
//! use hivework::core::entry::Entry;
//! use hivework::core::tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.root();
//! let db = tree.add(root, Entry::key("database").unwrap()).unwrap();
//! let name = tree.add(db, Entry::leaf("dbname", "harbinger").unwrap()).unwrap();
//!
//! assert_eq!(tree.word(name).unwrap(), "harbinger");
//! assert_eq!(tree.path_of(name).as_deref(), Some("database/dbname"));
//! assert!(tree.has_named_key(root, "database"));
//! ```

use std::fmt;

use super::entry::{write_pretty_line, Body, Entry, EntryError, PRETTY_INDENT};
use super::types::{EntryName, EntryType, LeafValue, Value};

/// Name given to every tree's root.
pub const ROOT_NAME: &str = "root";

/// Handle to a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    index: u32,
    generation: u32,
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: EntryName,
    parent: Option<EntryId>,
    body: NodeBody,
}

#[derive(Debug, Clone)]
enum NodeBody {
    Leaf(Value),
    Key(Vec<EntryId>),
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An in-memory registry tree.
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: EntryId,
    live: usize,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Tree {
    /// Structural and value equality; ids are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.snapshot(self.root) == other.snapshot(other.root)
    }
}

impl Eq for Tree {}

impl Tree {
    /// Create a tree holding only an empty root.
    pub fn new() -> Self {
        let root_node = Node {
            name: EntryName::root(),
            parent: None,
            body: NodeBody::Key(Vec::new()),
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root_node),
            }],
            free: Vec::new(),
            root: EntryId {
                index: 0,
                generation: 0,
            },
            live: 1,
        }
    }

    /// Build a tree whose root holds `children`.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::DuplicateName`] if two children share a name.
    pub fn from_children(children: Vec<Entry>) -> Result<Self, EntryError> {
        let mut tree = Self::new();
        let root = tree.root;
        for child in children {
            tree.add(root, child)?;
        }
        Ok(tree)
    }

    pub fn root(&self) -> EntryId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.live
    }

    /// True when the root has no children.
    pub fn is_empty(&self) -> bool {
        self.live == 1
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: EntryId) -> bool {
        self.node(id).is_some()
    }

    fn node(&self, id: EntryId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: EntryId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn require(&self, id: EntryId) -> Result<&Node, EntryError> {
        self.node(id)
            .ok_or_else(|| EntryError::NotFound(id.to_string()))
    }

    /// Human-facing location of a node for error messages.
    fn describe(&self, id: EntryId) -> String {
        match self.path_of(id) {
            Some(p) if p.is_empty() => "/".to_string(),
            Some(p) => p,
            None => id.to_string(),
        }
    }

    // =========================================================================
    // Node inspection
    // =========================================================================

    pub fn name(&self, id: EntryId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: EntryId) -> Option<EntryId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// The node's type; the root reports `EntryType::Root`.
    pub fn entry_type(&self, id: EntryId) -> Option<EntryType> {
        let node = self.node(id)?;
        Some(match &node.body {
            NodeBody::Leaf(v) => v.entry_type(),
            NodeBody::Key(_) if id == self.root => EntryType::Root,
            NodeBody::Key(_) => EntryType::Key,
        })
    }

    /// Whether the node is a container (Key or Root).
    pub fn is_key(&self, id: EntryId) -> bool {
        matches!(self.node(id).map(|n| &n.body), Some(NodeBody::Key(_)))
    }

    /// Children of a Key in insertion order.
    ///
    /// # Errors
    ///
    /// - [`EntryError::NotFound`] for a stale id
    /// - [`EntryError::NotAKey`] for a leaf
    pub fn children(&self, key: EntryId) -> Result<&[EntryId], EntryError> {
        match &self.require(key)?.body {
            NodeBody::Key(children) => Ok(children),
            NodeBody::Leaf(_) => Err(EntryError::NotAKey(self.describe(key))),
        }
    }

    /// Find a direct child of `key` by name.
    ///
    /// Returns `None` if `key` is a leaf, stale, or has no such child.
    pub fn get_named(&self, key: EntryId, name: &str) -> Option<EntryId> {
        let children = self.children(key).ok()?;
        children
            .iter()
            .copied()
            .find(|c| self.name(*c) == Some(name))
    }

    /// Whether `key` has a child called `name` that is itself a Key.
    pub fn has_named_key(&self, key: EntryId, name: &str) -> bool {
        self.get_named(key, name)
            .map(|id| self.is_key(id))
            .unwrap_or(false)
    }

    /// Rebuild the `/`-joined path of a node from the root.
    ///
    /// The root's path is the empty string.
    pub fn path_of(&self, id: EntryId) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = id;
        loop {
            let node = self.node(current)?;
            match node.parent {
                Some(parent) => {
                    segments.push(node.name.as_str());
                    current = parent;
                }
                None => break,
            }
        }
        segments.reverse();
        Some(segments.join("/"))
    }

    // =========================================================================
    // Leaf values
    // =========================================================================

    /// The scalar value of a leaf.
    ///
    /// # Errors
    ///
    /// - [`EntryError::NotFound`] for a stale id
    /// - [`EntryError::TypeMismatch`] for a Key; `expected` is reported as
    ///   `Word`, the plainest scalar
    pub fn value(&self, id: EntryId) -> Result<&Value, EntryError> {
        match &self.require(id)?.body {
            NodeBody::Leaf(v) => Ok(v),
            NodeBody::Key(_) => Err(self.mismatch(id, EntryType::Word)),
        }
    }

    fn mismatch(&self, id: EntryId, expected: EntryType) -> EntryError {
        EntryError::TypeMismatch {
            path: self.describe(id),
            expected,
            found: self.entry_type(id).unwrap_or(EntryType::Key),
        }
    }

    /// Typed read of a leaf.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::TypeMismatch`] if the leaf is of another type
    /// or the node is a Key.
    pub fn get<T: LeafValue>(&self, id: EntryId) -> Result<T, EntryError> {
        match &self.require(id)?.body {
            NodeBody::Leaf(v) => T::from_value(v).ok_or_else(|| self.mismatch(id, T::TYPE)),
            NodeBody::Key(_) => Err(self.mismatch(id, T::TYPE)),
        }
    }

    /// Typed in-place write of a leaf. Nothing changes on mismatch.
    pub fn set<T: LeafValue>(&mut self, id: EntryId, value: T) -> Result<(), EntryError> {
        self.set_value(id, value.into_value())
    }

    /// Replace a leaf's value with one of the same type.
    pub fn set_value(&mut self, id: EntryId, value: Value) -> Result<(), EntryError> {
        let expected = value.entry_type();
        let matches = matches!(
            &self.require(id)?.body,
            NodeBody::Leaf(current) if current.entry_type() == expected
        );
        if !matches {
            return Err(self.mismatch(id, expected));
        }
        if let Some(node) = self.node_mut(id) {
            node.body = NodeBody::Leaf(value);
        }
        Ok(())
    }

    pub fn word(&self, id: EntryId) -> Result<String, EntryError> {
        self.get(id)
    }

    pub fn int16(&self, id: EntryId) -> Result<i16, EntryError> {
        self.get(id)
    }

    pub fn int32(&self, id: EntryId) -> Result<i32, EntryError> {
        self.get(id)
    }

    pub fn int64(&self, id: EntryId) -> Result<i64, EntryError> {
        self.get(id)
    }

    pub fn boolean(&self, id: EntryId) -> Result<bool, EntryError> {
        self.get(id)
    }

    pub fn set_word(&mut self, id: EntryId, value: impl Into<String>) -> Result<(), EntryError> {
        self.set(id, value.into())
    }

    pub fn set_int16(&mut self, id: EntryId, value: i16) -> Result<(), EntryError> {
        self.set(id, value)
    }

    pub fn set_int32(&mut self, id: EntryId, value: i32) -> Result<(), EntryError> {
        self.set(id, value)
    }

    pub fn set_int64(&mut self, id: EntryId, value: i64) -> Result<(), EntryError> {
        self.set(id, value)
    }

    pub fn set_boolean(&mut self, id: EntryId, value: bool) -> Result<(), EntryError> {
        self.set(id, value)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Attach a detached entry (and its subtree) as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// - [`EntryError::NotAKey`] if `parent` is a leaf
    /// - [`EntryError::DuplicateName`] if `parent` already has a child of
    ///   that name; the tree is left unchanged
    pub fn add(&mut self, parent: EntryId, entry: Entry) -> Result<EntryId, EntryError> {
        self.children(parent)?;
        if self.get_named(parent, entry.name().as_str()).is_some() {
            return Err(EntryError::DuplicateName {
                parent: self.describe(parent),
                name: entry.name().to_string(),
            });
        }
        let id = self.insert(parent, entry);
        if let Some(NodeBody::Key(children)) = self.node_mut(parent).map(|n| &mut n.body) {
            children.push(id);
        }
        Ok(id)
    }

    /// Allocate `entry` and its descendants, linking each to its parent.
    ///
    /// Does not register `entry` in `parent`'s child list.
    fn insert(&mut self, parent: EntryId, entry: Entry) -> EntryId {
        let (name, body) = entry.into_parts();
        match body {
            Body::Leaf(value) => self.alloc(Node {
                name,
                parent: Some(parent),
                body: NodeBody::Leaf(value),
            }),
            Body::Key(children) => {
                let id = self.alloc(Node {
                    name,
                    parent: Some(parent),
                    body: NodeBody::Key(Vec::with_capacity(children.len())),
                });
                for child in children {
                    let child_id = self.insert(id, child);
                    if let Some(NodeBody::Key(list)) = self.node_mut(id).map(|n| &mut n.body) {
                        list.push(child_id);
                    }
                }
                id
            }
        }
    }

    fn alloc(&mut self, node: Node) -> EntryId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            EntryId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            EntryId {
                index,
                generation: 0,
            }
        }
    }

    /// Free a node and its subtree, returning it in detached form.
    fn release(&mut self, id: EntryId) -> Option<Entry> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;

        let body = match node.body {
            NodeBody::Leaf(v) => Body::Leaf(v),
            NodeBody::Key(children) => Body::Key(
                children
                    .into_iter()
                    .filter_map(|c| self.release(c))
                    .collect(),
            ),
        };
        Entry::from_parts(node.name, body).ok()
    }

    /// Remove `child` (and its subtree) from `parent`.
    ///
    /// Returns the removed subtree in detached form; its ids become stale.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::NotFound`] if `child` is not a child of `parent`.
    pub fn remove(&mut self, parent: EntryId, child: EntryId) -> Result<Entry, EntryError> {
        let position = self
            .children(parent)?
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| {
                EntryError::NotFound(format!(
                    "{} is not a child of '{}'",
                    child,
                    self.describe(parent)
                ))
            })?;
        if let Some(NodeBody::Key(children)) = self.node_mut(parent).map(|n| &mut n.body) {
            children.remove(position);
        }
        self.release(child)
            .ok_or_else(|| EntryError::NotFound(child.to_string()))
    }

    /// Remove the child named `name` from `parent`.
    pub fn remove_named(&mut self, parent: EntryId, name: &str) -> Result<Entry, EntryError> {
        let child = self.get_named(parent, name).ok_or_else(|| {
            EntryError::NotFound(format!("'{}' under '{}'", name, self.describe(parent)))
        })?;
        self.remove(parent, child)
    }

    /// Rename an attached entry, keeping its id, value and children.
    ///
    /// # Errors
    ///
    /// - [`EntryError::RootNotAllowed`] for the root
    /// - [`EntryError::Type`] if `name` is not a valid entry name
    /// - [`EntryError::DuplicateName`] if a sibling already uses `name`
    pub fn rename(&mut self, id: EntryId, name: &str) -> Result<(), EntryError> {
        let name = EntryName::new(name)?;
        let parent = self.require(id)?.parent.ok_or(EntryError::RootNotAllowed)?;
        match self.get_named(parent, name.as_str()) {
            Some(existing) if existing == id => return Ok(()),
            Some(_) => {
                return Err(EntryError::DuplicateName {
                    parent: self.describe(parent),
                    name: name.to_string(),
                })
            }
            None => {}
        }
        if let Some(node) = self.node_mut(id) {
            node.name = name;
        }
        Ok(())
    }

    /// Replace every child of `key` with the children of `snapshot`.
    ///
    /// Used to roll a subtree back to an earlier [`snapshot`](Self::snapshot).
    /// The id of `key` itself is preserved.
    pub fn restore(&mut self, key: EntryId, snapshot: &Entry) -> Result<(), EntryError> {
        let current: Vec<EntryId> = self.children(key)?.to_vec();
        if let Some(NodeBody::Key(children)) = self.node_mut(key).map(|n| &mut n.body) {
            children.clear();
        }
        for child in current {
            self.release(child);
        }
        for child in snapshot.children() {
            self.add(key, child.clone())?;
        }
        Ok(())
    }

    /// Detached copy of a subtree.
    ///
    /// The root is returned as a Key named [`ROOT_NAME`].
    pub fn snapshot(&self, id: EntryId) -> Option<Entry> {
        let node = self.node(id)?;
        let body = match &node.body {
            NodeBody::Leaf(v) => Body::Leaf(v.clone()),
            NodeBody::Key(children) => Body::Key(
                children
                    .iter()
                    .filter_map(|c| self.snapshot(*c))
                    .collect(),
            ),
        };
        Entry::from_parts(node.name.clone(), body).ok()
    }

    /// Depth-first, pre-order list of `id` and its descendants.
    pub fn descendants(&self, id: EntryId) -> Vec<EntryId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            if let Ok(children) = self.children(current) {
                stack.extend(children.iter().rev().copied());
            }
        }
        out
    }

    /// Human-readable indented dump of a subtree.
    ///
    /// Containers recurse; leaves append their value in brackets.
    pub fn pretty_print(&self, id: EntryId, indent: usize) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, id, indent);
        out
    }

    fn write_pretty(&self, out: &mut String, id: EntryId, indent: usize) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.body {
            NodeBody::Leaf(v) => write_pretty_line(out, indent, node.name.as_str(), Some(v)),
            NodeBody::Key(children) => {
                write_pretty_line(out, indent, node.name.as_str(), None);
                for child in children {
                    self.write_pretty(out, *child, indent + PRETTY_INDENT);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, EntryId, EntryId) {
        let mut tree = Tree::new();
        let root = tree.root();
        let http = tree.add(root, Entry::key("http_server").unwrap()).unwrap();
        let port = tree
            .add(http, Entry::leaf("port", 7768i32).unwrap())
            .unwrap();
        tree.add(http, Entry::leaf("enabled", false).unwrap())
            .unwrap();
        (tree, http, port)
    }

    #[test]
    fn new_tree_has_only_root() {
        let tree = Tree::new();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert_eq!(tree.entry_type(tree.root()), Some(EntryType::Root));
        assert_eq!(tree.parent(tree.root()), None);
        assert_eq!(tree.name(tree.root()), Some(ROOT_NAME));
    }

    #[test]
    fn add_links_parent_and_keeps_order() {
        let (tree, http, port) = sample();
        assert_eq!(tree.parent(port), Some(http));
        assert_eq!(tree.parent(http), Some(tree.root()));
        let names: Vec<_> = tree
            .children(http)
            .unwrap()
            .iter()
            .map(|c| tree.name(*c).unwrap())
            .collect();
        assert_eq!(names, vec!["port", "enabled"]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn duplicate_add_leaves_tree_unchanged() {
        let (mut tree, http, port) = sample();
        let before = tree.clone();

        let err = tree
            .add(http, Entry::leaf("port", 1i32).unwrap())
            .unwrap_err();
        assert!(matches!(err, EntryError::DuplicateName { .. }));
        assert_eq!(tree, before);
        assert_eq!(tree.int32(port).unwrap(), 7768);
    }

    #[test]
    fn add_under_leaf_fails() {
        let (mut tree, _, port) = sample();
        let err = tree.add(port, Entry::key("x").unwrap()).unwrap_err();
        assert!(matches!(err, EntryError::NotAKey(_)));
    }

    #[test]
    fn typed_accessors_check_type() {
        let (mut tree, http, port) = sample();
        assert_eq!(tree.int32(port).unwrap(), 7768);
        assert!(matches!(
            tree.word(port),
            Err(EntryError::TypeMismatch {
                expected: EntryType::Word,
                found: EntryType::Int32,
                ..
            })
        ));

        assert!(tree.set_word(port, "nope").is_err());
        assert_eq!(tree.int32(port).unwrap(), 7768);

        tree.set_int32(port, 8080).unwrap();
        assert_eq!(tree.int32(port).unwrap(), 8080);

        assert!(matches!(
            tree.int32(http),
            Err(EntryError::TypeMismatch {
                found: EntryType::Key,
                ..
            })
        ));
    }

    #[test]
    fn remove_frees_subtree_and_stales_ids() {
        let (mut tree, http, port) = sample();
        let root = tree.root();

        let removed = tree.remove(root, http).unwrap();
        assert_eq!(removed.name().as_str(), "http_server");
        assert_eq!(removed.children().len(), 2);
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(http));
        assert!(!tree.contains(port));

        // Reused slots must not resurrect stale ids.
        let fresh = tree.add(root, Entry::leaf("x", 1i16).unwrap()).unwrap();
        assert!(tree.contains(fresh));
        assert!(!tree.contains(http));
        assert!(!tree.contains(port));
    }

    #[test]
    fn remove_requires_parent_child_relation() {
        let (mut tree, http, port) = sample();
        let root = tree.root();
        assert!(matches!(tree.remove(root, port), Err(EntryError::NotFound(_))));
        assert!(tree.contains(port));
        assert!(tree.remove(http, port).is_ok());
    }

    #[test]
    fn remove_named_by_name() {
        let (mut tree, http, port) = sample();
        let removed = tree.remove_named(http, "port").unwrap();
        assert_eq!(removed.value(), Some(&Value::Int32(7768)));
        assert!(!tree.contains(port));
        assert!(matches!(
            tree.remove_named(http, "port"),
            Err(EntryError::NotFound(_))
        ));
    }

    #[test]
    fn rename_keeps_id_and_value() {
        let (mut tree, http, port) = sample();
        tree.rename(port, "http").unwrap();
        assert_eq!(tree.get_named(http, "http"), Some(port));
        assert!(tree.get_named(http, "port").is_none());
        assert_eq!(tree.int32(port).unwrap(), 7768);
        assert_eq!(tree.path_of(port).as_deref(), Some("http_server/http"));

        let before = tree.clone();
        assert!(matches!(
            tree.rename(port, "enabled"),
            Err(EntryError::DuplicateName { .. })
        ));
        assert!(matches!(
            tree.rename(port, "a/b"),
            Err(EntryError::Type(_))
        ));
        let root = tree.root();
        assert_eq!(tree.rename(root, "other"), Err(EntryError::RootNotAllowed));
        assert_eq!(tree, before);
    }

    #[test]
    fn value_of_key_is_a_type_mismatch() {
        let (tree, http, _) = sample();
        assert!(matches!(
            tree.value(http),
            Err(EntryError::TypeMismatch {
                found: EntryType::Key,
                ..
            })
        ));
    }

    #[test]
    fn has_named_key_only_for_keys() {
        let (tree, http, _) = sample();
        assert!(tree.has_named_key(tree.root(), "http_server"));
        assert!(!tree.has_named_key(http, "port"));
        assert!(!tree.has_named_key(http, "missing"));
    }

    #[test]
    fn path_reconstruction() {
        let (tree, http, port) = sample();
        assert_eq!(tree.path_of(tree.root()).as_deref(), Some(""));
        assert_eq!(tree.path_of(http).as_deref(), Some("http_server"));
        assert_eq!(tree.path_of(port).as_deref(), Some("http_server/port"));
    }

    #[test]
    fn snapshot_and_restore() {
        let (mut tree, http, port) = sample();
        let saved = tree.snapshot(http).unwrap();

        tree.set_int32(port, 1).unwrap();
        tree.add(http, Entry::leaf("psk", "x").unwrap()).unwrap();
        tree.restore(http, &saved).unwrap();

        assert_eq!(tree.snapshot(http).unwrap(), saved);
        assert!(tree.contains(http));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn descendants_pre_order() {
        let (tree, http, port) = sample();
        let order = tree.descendants(tree.root());
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], tree.root());
        assert_eq!(order[1], http);
        assert_eq!(order[2], port);
    }

    #[test]
    fn pretty_print_matches_detached_form() {
        let (tree, http, _) = sample();
        let text = tree.pretty_print(tree.root(), 0);
        assert_eq!(
            text,
            "root\n  http_server\n    port [7768]\n    enabled [false]\n"
        );
        assert_eq!(
            tree.pretty_print(http, 0),
            tree.snapshot(http).unwrap().pretty_print(0)
        );
    }

    #[test]
    fn from_children_rejects_duplicates() {
        let err = Tree::from_children(vec![
            Entry::key("a").unwrap(),
            Entry::leaf("a", 1i32).unwrap(),
        ])
        .unwrap_err();
        assert!(matches!(err, EntryError::DuplicateName { .. }));
    }
}
