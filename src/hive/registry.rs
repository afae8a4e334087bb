//! hive::registry
//!
//! Shared handle to a loaded tree.
//!
//! A [`Registry`] is created by the hive manager at load time and cloned
//! into every consumer. All structural mutations and whole-tree traversals
//! go through [`Registry::lock`], which serializes them on one mutex.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::core::tree::Tree;
use crate::core::types::HiveName;

/// Cloneable handle to one hive's in-memory tree.
#[derive(Clone)]
pub struct Registry {
    name: HiveName,
    tree: Arc<Mutex<Tree>>,
}

impl Registry {
    pub fn new(name: HiveName, tree: Tree) -> Self {
        Self {
            name,
            tree: Arc::new(Mutex::new(tree)),
        }
    }

    /// The hive this registry was loaded from.
    pub fn name(&self) -> &HiveName {
        &self.name
    }

    /// Lock the tree.
    ///
    /// A poisoned lock is recovered: the tree is plain data and every tree
    /// operation leaves it consistent even when it fails.
    pub fn lock(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with the tree locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut Tree) -> R) -> R {
        f(&mut self.lock())
    }

    /// Swap in a whole new tree, returning the old one.
    pub fn replace(&self, tree: Tree) -> Tree {
        std::mem::replace(&mut *self.lock(), tree)
    }

    /// Whether two handles share the same tree.
    pub fn same_as(&self, other: &Registry) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Registry");
        out.field("name", &self.name);
        // Must not block: callers may format while holding the lock.
        match self.tree.try_lock() {
            Ok(tree) => out.field("entries", &tree.len()),
            Err(TryLockError::Poisoned(poisoned)) => {
                out.field("entries", &poisoned.into_inner().len())
            }
            Err(TryLockError::WouldBlock) => out.field("entries", &"<locked>"),
        };
        out.finish()
    }
}
