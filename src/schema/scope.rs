//! schema::scope
//!
//! The view a schema gets of its own Key, and typed field handles.

use std::fmt;
use std::marker::PhantomData;

use super::MigrationError;
use crate::core::entry::{Entry, EntryError};
use crate::core::tree::{EntryId, Tree};
use crate::core::types::LeafValue;

/// A schema's Key inside the tree.
///
/// Activation steps get `&mut KeyScope` and may add or rename leaves;
/// binding gets `&KeyScope` and only looks.
pub struct KeyScope<'a> {
    tree: &'a mut Tree,
    key: EntryId,
    schema: &'static str,
}

impl<'a> KeyScope<'a> {
    pub(crate) fn new(tree: &'a mut Tree, key: EntryId, schema: &'static str) -> Self {
        Self { tree, key, schema }
    }

    /// Id of the wrapped Key.
    pub fn key(&self) -> EntryId {
        self.key
    }

    pub fn tree(&self) -> &Tree {
        &*self.tree
    }

    /// Create `field` with `default` unless it already exists.
    ///
    /// An existing leaf keeps its stored value.
    ///
    /// # Errors
    ///
    /// [`EntryError::TypeMismatch`] if a leaf of that name exists with
    /// another type, or [`EntryError::NotAKey`] if it is a Key.
    pub fn introduce<T: LeafValue>(
        &mut self,
        field: &Field<T>,
        default: T,
    ) -> Result<(), MigrationError> {
        match self.tree.get_named(self.key, field.name) {
            Some(existing) => {
                self.tree.get::<T>(existing)?;
            }
            None => {
                self.tree
                    .add(self.key, Entry::leaf(field.name, default.into_value())?)?;
                tracing::debug!(schema = self.schema, field = field.name, "introduced field");
            }
        }
        Ok(())
    }

    /// Give the leaf called `from` the name of `field`, keeping its value.
    ///
    /// Returns `false` if there is no leaf called `from`, so the caller can
    /// introduce the field instead.
    ///
    /// # Errors
    ///
    /// - [`EntryError::TypeMismatch`] if `from` has another type
    /// - [`EntryError::DuplicateName`] if `field` already exists
    pub fn rename<T: LeafValue>(
        &mut self,
        from: &str,
        field: &Field<T>,
    ) -> Result<bool, MigrationError> {
        let Some(id) = self.tree.get_named(self.key, from) else {
            return Ok(false);
        };
        self.tree.get::<T>(id)?;
        self.tree.rename(id, field.name)?;
        tracing::debug!(schema = self.schema, from, field = field.name, "renamed field");
        Ok(true)
    }

    /// Point `field` at its existing, correctly typed leaf.
    ///
    /// # Errors
    ///
    /// - [`MigrationError::MissingField`] if no leaf has the field's name
    /// - [`MigrationError::Entry`] if the leaf has another type
    pub fn bind<T: LeafValue>(&self, field: &mut Field<T>) -> Result<(), MigrationError> {
        let id = self
            .tree
            .get_named(self.key, field.name)
            .ok_or(MigrationError::MissingField {
                schema: self.schema,
                field: field.name,
            })?;
        self.tree.get::<T>(id)?;
        field.id = Some(id);
        Ok(())
    }
}

/// Typed handle to one leaf of a schema.
///
/// Created unbound with a name; [`KeyScope::bind`] attaches it to a leaf.
/// Handles go stale if their hive is reloaded; bind again after a reload.
pub struct Field<T> {
    name: &'static str,
    id: Option<EntryId>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: LeafValue> Field<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            id: None,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> Option<EntryId> {
        self.id
    }

    pub fn is_bound(&self) -> bool {
        self.id.is_some()
    }

    fn bound(&self) -> Result<EntryId, EntryError> {
        self.id
            .ok_or_else(|| EntryError::NotFound(format!("unbound field '{}'", self.name)))
    }

    pub fn get(&self, tree: &Tree) -> Result<T, EntryError> {
        tree.get(self.bound()?)
    }

    pub fn set(&self, tree: &mut Tree, value: T) -> Result<(), EntryError> {
        tree.set(self.bound()?, value)
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish()
    }
}
