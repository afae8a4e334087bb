//! core::entry
//!
//! Owned, detached registry entries.
//!
//! An [`Entry`] is a node that is not (yet) part of a [`Tree`]: programs
//! build subtrees with it before attaching them, the codec materializes
//! files into it, and [`Tree::snapshot`] hands one back for comparison or
//! export.
//!
//! # Example
//!
//! ```
//! use hivework::core::entry::Entry;
//! use hivework::core::types::EntryType;
//!
//! let db = Entry::key("database")
//!     .unwrap()
//!     .with_child(Entry::leaf("dbname", "harbinger").unwrap())
//!     .unwrap()
//!     .with_child(Entry::new("port", EntryType::Int32).unwrap())
//!     .unwrap();
//!
//! assert_eq!(db.children().len(), 2);
//! assert!(db.pretty_print(0).contains("dbname [harbinger]"));
//! ```
//!
//! [`Tree`]: crate::core::tree::Tree
//! [`Tree::snapshot`]: crate::core::tree::Tree::snapshot

use std::fmt::Write as _;

use serde_json::json;
use thiserror::Error;

use super::types::{EntryName, EntryType, LeafValue, TypeError, Value};

/// Errors from entry and tree operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    /// A sibling with the same name already exists.
    #[error("an entry named '{name}' already exists under '{parent}'")]
    DuplicateName { parent: String, name: String },

    /// A typed accessor was used on an entry of another type.
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: EntryType,
        found: EntryType,
    },

    /// A Key operation was attempted on a leaf.
    #[error("'{0}' is not a key")]
    NotAKey(String),

    /// The entry does not exist (or was removed).
    #[error("no such entry: {0}")]
    NotFound(String),

    /// Roots only exist as the top of a tree.
    #[error("root entries cannot be created or attached")]
    RootNotAllowed,

    /// A path could not be used for placement.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Payload of a detached entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// A scalar leaf.
    Leaf(Value),
    /// A container with ordered, uniquely named children.
    Key(Vec<Entry>),
}

/// A detached registry node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: EntryName,
    body: Body,
}

impl Entry {
    /// Create an entry of the given type with its default payload.
    ///
    /// Scalars start at their zero value (`""`, `0`, `false`); Keys start
    /// empty.
    ///
    /// # Errors
    ///
    /// - [`EntryError::RootNotAllowed`] for `EntryType::Root`
    /// - [`EntryError::Type`] if the name is invalid
    pub fn new(name: &str, ty: EntryType) -> Result<Self, EntryError> {
        let name = EntryName::new(name)?;
        let body = match ty {
            EntryType::Root => return Err(EntryError::RootNotAllowed),
            EntryType::Key => Body::Key(Vec::new()),
            scalar => match Value::default_for(scalar) {
                Some(v) => Body::Leaf(v),
                None => return Err(EntryError::RootNotAllowed),
            },
        };
        Ok(Self { name, body })
    }

    /// Create a leaf holding `value`.
    pub fn leaf(name: &str, value: impl Into<Value>) -> Result<Self, EntryError> {
        Ok(Self {
            name: EntryName::new(name)?,
            body: Body::Leaf(value.into()),
        })
    }

    /// Create an empty Key.
    pub fn key(name: &str) -> Result<Self, EntryError> {
        Ok(Self {
            name: EntryName::new(name)?,
            body: Body::Key(Vec::new()),
        })
    }

    /// Assemble an entry from already validated parts.
    ///
    /// Sibling uniqueness of `Body::Key` children is checked.
    pub fn from_parts(name: EntryName, body: Body) -> Result<Self, EntryError> {
        match body {
            Body::Leaf(v) => Ok(Self {
                name,
                body: Body::Leaf(v),
            }),
            Body::Key(children) => {
                let mut entry = Self {
                    name,
                    body: Body::Key(Vec::with_capacity(children.len())),
                };
                for child in children {
                    entry.push(child)?;
                }
                Ok(entry)
            }
        }
    }

    pub fn name(&self) -> &EntryName {
        &self.name
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn into_parts(self) -> (EntryName, Body) {
        (self.name, self.body)
    }

    /// The entry's type. Detached entries are never `Root`.
    pub fn entry_type(&self) -> EntryType {
        match &self.body {
            Body::Leaf(v) => v.entry_type(),
            Body::Key(_) => EntryType::Key,
        }
    }

    pub fn is_key(&self) -> bool {
        matches!(self.body, Body::Key(_))
    }

    /// The scalar value, or `None` for Keys.
    pub fn value(&self) -> Option<&Value> {
        match &self.body {
            Body::Leaf(v) => Some(v),
            Body::Key(_) => None,
        }
    }

    /// Typed read of a leaf value.
    pub fn get<T: LeafValue>(&self) -> Result<T, EntryError> {
        self.value()
            .and_then(T::from_value)
            .ok_or_else(|| EntryError::TypeMismatch {
                path: self.name.to_string(),
                expected: T::TYPE,
                found: self.entry_type(),
            })
    }

    /// Children in insertion order; empty for leaves.
    pub fn children(&self) -> &[Entry] {
        match &self.body {
            Body::Key(children) => children,
            Body::Leaf(_) => &[],
        }
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&Entry> {
        self.children().iter().find(|c| c.name.as_str() == name)
    }

    /// Append a child, keeping sibling names unique.
    ///
    /// # Errors
    ///
    /// - [`EntryError::NotAKey`] if this entry is a leaf
    /// - [`EntryError::DuplicateName`] if a child of that name exists
    pub fn push(&mut self, child: Entry) -> Result<(), EntryError> {
        let parent = self.name.to_string();
        match &mut self.body {
            Body::Leaf(_) => Err(EntryError::NotAKey(parent)),
            Body::Key(children) => {
                if children.iter().any(|c| c.name == child.name) {
                    return Err(EntryError::DuplicateName {
                        parent,
                        name: child.name.to_string(),
                    });
                }
                children.push(child);
                Ok(())
            }
        }
    }

    /// Builder form of [`push`](Self::push).
    pub fn with_child(mut self, child: Entry) -> Result<Self, EntryError> {
        self.push(child)?;
        Ok(self)
    }

    /// Number of nodes in this subtree, including itself.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Entry::count).sum::<usize>()
    }

    /// Human-readable indented dump.
    pub fn pretty_print(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, indent);
        out
    }

    fn write_pretty(&self, out: &mut String, indent: usize) {
        write_pretty_line(out, indent, self.name.as_str(), self.value());
        for child in self.children() {
            child.write_pretty(out, indent + PRETTY_INDENT);
        }
    }

    /// JSON rendering used by `hv show --json`.
    pub fn to_json(&self) -> serde_json::Value {
        match &self.body {
            Body::Leaf(v) => json!({
                "name": self.name.as_str(),
                "type": v.entry_type().as_str(),
                "value": value_to_json(v),
            }),
            Body::Key(children) => json!({
                "name": self.name.as_str(),
                "type": EntryType::Key.as_str(),
                "children": children.iter().map(Entry::to_json).collect::<Vec<_>>(),
            }),
        }
    }
}

/// Spaces added per nesting level in pretty output.
pub(crate) const PRETTY_INDENT: usize = 2;

/// Write one pretty-print line: containers print their name, leaves append
/// their value in brackets.
pub(crate) fn write_pretty_line(out: &mut String, indent: usize, name: &str, value: Option<&Value>) {
    let _ = match value {
        Some(v) => writeln!(out, "{:indent$}{} [{}]", "", name, v, indent = indent),
        None => writeln!(out, "{:indent$}{}", "", name, indent = indent),
    };
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Word(s) => json!(s),
        Value::Int16(n) => json!(n),
        Value::Int32(n) => json!(n),
        Value::Int64(n) => json!(n),
        Value::Bool(b) => json!(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_type_defaults() {
        assert_eq!(
            Entry::new("w", EntryType::Word).unwrap().value(),
            Some(&Value::Word(String::new()))
        );
        assert_eq!(
            Entry::new("n", EntryType::Int64).unwrap().value(),
            Some(&Value::Int64(0))
        );
        let key = Entry::new("k", EntryType::Key).unwrap();
        assert!(key.is_key());
        assert!(key.children().is_empty());
    }

    #[test]
    fn root_cannot_be_created() {
        assert_eq!(
            Entry::new("root", EntryType::Root),
            Err(EntryError::RootNotAllowed)
        );
    }

    #[test]
    fn duplicate_child_rejected_and_first_kept() {
        let mut key = Entry::key("k").unwrap();
        key.push(Entry::leaf("x", 1i32).unwrap()).unwrap();

        let err = key.push(Entry::leaf("x", 2i32).unwrap()).unwrap_err();
        assert!(matches!(err, EntryError::DuplicateName { .. }));
        assert_eq!(key.children().len(), 1);
        assert_eq!(key.child("x").unwrap().get::<i32>().unwrap(), 1);
    }

    #[test]
    fn leaf_cannot_hold_children() {
        let mut leaf = Entry::leaf("x", true).unwrap();
        let err = leaf.push(Entry::leaf("y", 1i16).unwrap()).unwrap_err();
        assert_eq!(err, EntryError::NotAKey("x".into()));
    }

    #[test]
    fn typed_get_mismatch() {
        let leaf = Entry::leaf("dbname", "harbinger").unwrap();
        assert_eq!(leaf.get::<String>().unwrap(), "harbinger");
        assert!(matches!(
            leaf.get::<i32>(),
            Err(EntryError::TypeMismatch {
                expected: EntryType::Int32,
                found: EntryType::Word,
                ..
            })
        ));
    }

    #[test]
    fn from_parts_checks_uniqueness() {
        let body = Body::Key(vec![
            Entry::leaf("a", 1i32).unwrap(),
            Entry::leaf("a", 2i32).unwrap(),
        ]);
        let name = EntryName::new("k").unwrap();
        assert!(matches!(
            Entry::from_parts(name, body),
            Err(EntryError::DuplicateName { .. })
        ));
    }

    #[test]
    fn from_parts_keeps_children_in_order() {
        let body = Body::Key(vec![
            Entry::leaf("tcp", 7791i32).unwrap(),
            Entry::key("nested")
                .unwrap()
                .with_child(Entry::leaf("on", true).unwrap())
                .unwrap(),
        ]);
        let entry = Entry::from_parts(EntryName::new("sockets").unwrap(), body).unwrap();
        let names: Vec<_> = entry.children().iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, vec!["tcp", "nested"]);
        assert_eq!(entry.count(), 4);

        let leaf = Entry::from_parts(EntryName::new("x").unwrap(), Body::Leaf(Value::Int16(3)))
            .unwrap();
        assert_eq!(leaf.get::<i16>().unwrap(), 3);
    }

    #[test]
    fn pretty_print_brackets_leaves() {
        let tree = Entry::key("http_server")
            .unwrap()
            .with_child(Entry::leaf("port", 7768i32).unwrap())
            .unwrap()
            .with_child(Entry::key("udp").unwrap())
            .unwrap();

        assert_eq!(tree.pretty_print(0), "http_server\n  port [7768]\n  udp\n");
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn json_rendering() {
        let tree = Entry::key("k")
            .unwrap()
            .with_child(Entry::leaf("on", true).unwrap())
            .unwrap();
        let json = tree.to_json();
        assert_eq!(json["type"], "key");
        assert_eq!(json["children"][0]["name"], "on");
        assert_eq!(json["children"][0]["type"], "bool");
        assert_eq!(json["children"][0]["value"], true);
    }
}
