//! schema
//!
//! Versioned subtrees.
//!
//! # Overview
//!
//! A component that keeps settings in the registry owns one Key and
//! describes how that Key grows over time as numbered activation steps.
//! [`SchemaCodec::open`] brings the Key up to date and binds the
//! component's [`Field`] handles:
//!
//! | stored `version`        | action                                   | outcome       |
//! |-------------------------|------------------------------------------|---------------|
//! | absent                  | activate `1..=CURRENT`, bind             | `Initialized` |
//! | `v == CURRENT`          | bind                                     | `Current`     |
//! | `1 <= v < CURRENT`      | activate `v+1..=CURRENT`, bind           | `Upgraded`    |
//! | anything else           | [`MigrationError::UnsupportedSchemaVersion`], Key untouched |  |
//!
//! After each step the Int32 `version` leaf is raised to that step's
//! number. Steps add leaves or rename them; values already stored are never
//! reset, so old data upgrades in place the first time newer code opens it.
//!
//! If a step fails, the Key is restored to what it held before `open`.
//!
//! # Example
//!
//! ```
//! use hivework::core::tree::Tree;
//! use hivework::schema::{Field, KeyScope, MigrationError, MigrationOutcome, SchemaCodec, VersionedSchema};
//!
//! struct Greeter {
//!     greeting: Field<String>,
//! }
//!
//! impl VersionedSchema for Greeter {
//!     const NAME: &'static str = "greeter";
//!     const CURRENT_VERSION: u32 = 1;
//!
//!     fn activate(&mut self, key: &mut KeyScope<'_>, version: u32) -> Result<(), MigrationError> {
//!         match version {
//!             1 => key.introduce(&self.greeting, "hello".to_string()),
//!             _ => Err(MigrationError::unknown_step::<Self>(version)),
//!         }
//!     }
//!
//!     fn bind(&mut self, key: &KeyScope<'_>) -> Result<(), MigrationError> {
//!         key.bind(&mut self.greeting)
//!     }
//! }
//!
//! let mut tree = Tree::new();
//! let mut greeter = Greeter { greeting: Field::new("greeting") };
//! let outcome = SchemaCodec::open_at(&mut tree, "greeter", &mut greeter).unwrap();
//! assert_eq!(outcome, MigrationOutcome::Initialized { to: 1 });
//! assert_eq!(greeter.greeting.get(&tree).unwrap(), "hello");
//! ```

mod scope;

pub use scope::{Field, KeyScope};

use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::core::entry::{Entry, EntryError};
use crate::core::path;
use crate::core::tree::{EntryId, Tree};
use crate::core::types::Value;

/// Name of the leaf holding a Key's schema version.
pub const VERSION_LEAF: &str = "version";

/// Errors from opening a versioned Key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MigrationError {
    /// The stored version is newer than the code, below 1, or not an Int32.
    #[error("schema '{schema}' has unsupported version {found} (this build supports 1..={supported})")]
    UnsupportedSchemaVersion {
        schema: &'static str,
        found: String,
        supported: u32,
    },

    /// A schema has no activation step for this version.
    #[error("schema '{schema}' has no activation step for version {version}")]
    UnknownStep { schema: &'static str, version: u32 },

    /// Something tried to lower a stored version.
    #[error("schema '{schema}' version cannot go from {from} down to {to}")]
    VersionRegression {
        schema: &'static str,
        from: u32,
        to: u32,
    },

    /// Binding found no leaf for a declared field.
    #[error("schema '{schema}' is missing field '{field}'")]
    MissingField {
        schema: &'static str,
        field: &'static str,
    },

    #[error(transparent)]
    Entry(#[from] EntryError),
}

impl MigrationError {
    /// The error for an activation step number the schema does not define.
    pub fn unknown_step<S: VersionedSchema + ?Sized>(version: u32) -> Self {
        MigrationError::UnknownStep {
            schema: S::NAME,
            version,
        }
    }
}

/// A component-owned Key that evolves through numbered activation steps.
pub trait VersionedSchema {
    /// Schema name used in logs and errors.
    const NAME: &'static str;

    /// Latest version this code knows. Must be at least 1.
    const CURRENT_VERSION: u32;

    /// Add the leaves introduced at `version`, with their defaults.
    ///
    /// Never removes or resets leaves from earlier versions. The driver
    /// records the version afterwards.
    fn activate(&mut self, key: &mut KeyScope<'_>, version: u32) -> Result<(), MigrationError>;

    /// Bind field handles to existing leaves without changing anything.
    fn bind(&mut self, key: &KeyScope<'_>) -> Result<(), MigrationError>;
}

/// What opening a Key did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The Key had no version and was built from step 1.
    Initialized { to: u32 },
    /// The Key was brought forward from an older version.
    Upgraded { from: u32, to: u32 },
    /// The Key was already current; nothing changed.
    Current { version: u32 },
}

impl MigrationOutcome {
    /// The version the Key is at now.
    pub fn version(&self) -> u32 {
        match *self {
            MigrationOutcome::Initialized { to } | MigrationOutcome::Upgraded { to, .. } => to,
            MigrationOutcome::Current { version } => version,
        }
    }

    /// Whether the tree was modified.
    pub fn changed(&self) -> bool {
        !matches!(self, MigrationOutcome::Current { .. })
    }
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationOutcome::Initialized { to } => write!(f, "initialized at v{}", to),
            MigrationOutcome::Upgraded { from, to } => write!(f, "upgraded v{} -> v{}", from, to),
            MigrationOutcome::Current { version } => write!(f, "current at v{}", version),
        }
    }
}

/// Where a Key stands before opening.
enum Stored {
    Uninitialized,
    Versioned(u32),
}

/// Drives a [`VersionedSchema`] over its Key.
pub struct SchemaCodec;

impl SchemaCodec {
    /// Open the schema's Key at `path` below the root, creating it if needed.
    ///
    /// Every Key created here, intermediate ones included, is removed again
    /// if opening fails.
    pub fn open_at<S: VersionedSchema>(
        tree: &mut Tree,
        key_path: &str,
        schema: &mut S,
    ) -> Result<MigrationOutcome, MigrationError> {
        let root = tree.root();
        let created = first_missing(tree, key_path);
        let key = path::ensure_key(tree, root, key_path)?;

        let result = Self::open(tree, key, schema);
        if result.is_err() {
            if let Some(created) = created {
                let _ = path::remove_at_path(tree, root, &created);
            }
        }
        result
    }

    /// Initialize, upgrade or just bind the schema's Key.
    ///
    /// # Errors
    ///
    /// - [`MigrationError::UnsupportedSchemaVersion`] for a version this
    ///   code cannot handle; nothing is modified
    /// - any error from an activation step or from binding; the Key is
    ///   rolled back to its state before the call
    pub fn open<S: VersionedSchema>(
        tree: &mut Tree,
        key: EntryId,
        schema: &mut S,
    ) -> Result<MigrationOutcome, MigrationError> {
        let current = S::CURRENT_VERSION;
        let stored = Self::stored_version::<S>(tree, key)?;

        let outcome = match stored {
            Stored::Versioned(v) if v == current => {
                schema.bind(&KeyScope::new(tree, key, S::NAME))?;
                return Ok(MigrationOutcome::Current { version: v });
            }
            Stored::Versioned(v) => MigrationOutcome::Upgraded { from: v, to: current },
            Stored::Uninitialized => MigrationOutcome::Initialized { to: current },
        };
        let first = match outcome {
            MigrationOutcome::Upgraded { from, .. } => from + 1,
            _ => 1,
        };

        let snapshot = tree.snapshot(key);
        if let Err(e) = Self::run_steps(tree, key, schema, first..=current) {
            if let Some(snapshot) = snapshot {
                tree.restore(key, &snapshot)?;
            }
            return Err(e);
        }

        info!(schema = S::NAME, %outcome, "schema opened");
        Ok(outcome)
    }

    fn run_steps<S: VersionedSchema>(
        tree: &mut Tree,
        key: EntryId,
        schema: &mut S,
        steps: std::ops::RangeInclusive<u32>,
    ) -> Result<(), MigrationError> {
        for version in steps {
            schema.activate(&mut KeyScope::new(tree, key, S::NAME), version)?;
            Self::record_version::<S>(tree, key, version)?;
        }
        schema.bind(&KeyScope::new(tree, key, S::NAME))
    }

    fn stored_version<S: VersionedSchema>(
        tree: &Tree,
        key: EntryId,
    ) -> Result<Stored, MigrationError> {
        let unsupported = |found: String| MigrationError::UnsupportedSchemaVersion {
            schema: S::NAME,
            found,
            supported: S::CURRENT_VERSION,
        };

        tree.children(key)?;
        let Some(leaf) = tree.get_named(key, VERSION_LEAF) else {
            return Ok(Stored::Uninitialized);
        };
        match tree.value(leaf) {
            Ok(Value::Int32(v)) => match u32::try_from(*v) {
                Ok(v) if (1..=S::CURRENT_VERSION).contains(&v) => Ok(Stored::Versioned(v)),
                _ => Err(unsupported(v.to_string())),
            },
            Ok(other) => Err(unsupported(format!("{} ({})", other, other.entry_type()))),
            Err(_) => Err(unsupported("a key".to_string())),
        }
    }

    /// Raise the `version` leaf of `key` to `version`.
    ///
    /// # Errors
    ///
    /// [`MigrationError::VersionRegression`] if the stored version is
    /// already higher.
    pub fn record_version<S: VersionedSchema>(
        tree: &mut Tree,
        key: EntryId,
        version: u32,
    ) -> Result<(), MigrationError> {
        let stored = i32::try_from(version).map_err(|_| MigrationError::UnknownStep {
            schema: S::NAME,
            version,
        })?;
        match tree.get_named(key, VERSION_LEAF) {
            Some(leaf) => {
                let previous = tree.int32(leaf)?;
                if previous > stored {
                    return Err(MigrationError::VersionRegression {
                        schema: S::NAME,
                        from: previous.max(0) as u32,
                        to: version,
                    });
                }
                tree.set_int32(leaf, stored)?;
            }
            None => {
                tree.add(key, Entry::leaf(VERSION_LEAF, stored)?)?;
            }
        }
        Ok(())
    }
}

/// The shortest prefix of `key_path` that does not exist yet.
fn first_missing(tree: &Tree, key_path: &str) -> Option<String> {
    let segments = path::segments(key_path);
    (1..=segments.len())
        .map(|n| path::join(&segments[..n]))
        .find(|prefix| path::get_by_path(tree, tree.root(), prefix).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::path::{get_by_path, place_at_path};

    /// Two-version schema: v1 `name`, v2 `dbtype`.
    struct Db {
        name: Field<String>,
        dbtype: Field<String>,
        fail_at: Option<u32>,
    }

    impl Db {
        fn new() -> Self {
            Self {
                name: Field::new("name"),
                dbtype: Field::new("dbtype"),
                fail_at: None,
            }
        }
    }

    impl VersionedSchema for Db {
        const NAME: &'static str = "db";
        const CURRENT_VERSION: u32 = 2;

        fn activate(&mut self, key: &mut KeyScope<'_>, version: u32) -> Result<(), MigrationError> {
            if self.fail_at == Some(version) {
                return Err(MigrationError::unknown_step::<Self>(version));
            }
            match version {
                1 => key.introduce(&self.name, "dbname".to_string()),
                2 => key.introduce(&self.dbtype, "Registry".to_string()),
                _ => Err(MigrationError::unknown_step::<Self>(version)),
            }
        }

        fn bind(&mut self, key: &KeyScope<'_>) -> Result<(), MigrationError> {
            key.bind(&mut self.name)?;
            key.bind(&mut self.dbtype)
        }
    }

    fn version_of(tree: &Tree, key_path: &str) -> i32 {
        let id = get_by_path(tree, tree.root(), &format!("{}/version", key_path)).unwrap();
        tree.int32(id).unwrap()
    }

    fn v1_tree(name: &str) -> Tree {
        let mut tree = Tree::new();
        let root = tree.root();
        place_at_path(&mut tree, root, "db", Entry::leaf("version", 1i32).unwrap()).unwrap();
        place_at_path(&mut tree, root, "db", Entry::leaf("name", name).unwrap()).unwrap();
        tree
    }

    #[test]
    fn initialize_runs_every_step() {
        let mut tree = Tree::new();
        let mut db = Db::new();
        let outcome = SchemaCodec::open_at(&mut tree, "db", &mut db).unwrap();

        assert_eq!(outcome, MigrationOutcome::Initialized { to: 2 });
        assert_eq!(version_of(&tree, "db"), 2);
        assert_eq!(db.name.get(&tree).unwrap(), "dbname");
        assert_eq!(db.dbtype.get(&tree).unwrap(), "Registry");
    }

    #[test]
    fn upgrade_preserves_stored_values() {
        let mut tree = v1_tree("dbname");
        let mut db = Db::new();
        let outcome = SchemaCodec::open_at(&mut tree, "db", &mut db).unwrap();

        assert_eq!(outcome, MigrationOutcome::Upgraded { from: 1, to: 2 });
        assert_eq!(version_of(&tree, "db"), 2);
        assert_eq!(db.name.get(&tree).unwrap(), "dbname");
        assert_eq!(db.dbtype.get(&tree).unwrap(), "Registry");
    }

    #[test]
    fn upgrade_keeps_customized_value() {
        let mut tree = v1_tree("custom");
        let mut db = Db::new();
        SchemaCodec::open_at(&mut tree, "db", &mut db).unwrap();
        assert_eq!(db.name.get(&tree).unwrap(), "custom");
    }

    #[test]
    fn current_only_binds() {
        let mut tree = Tree::new();
        SchemaCodec::open_at(&mut tree, "db", &mut Db::new()).unwrap();
        let before = tree.clone();

        let mut db = Db::new();
        let outcome = SchemaCodec::open_at(&mut tree, "db", &mut db).unwrap();
        assert_eq!(outcome, MigrationOutcome::Current { version: 2 });
        assert!(!outcome.changed());
        assert_eq!(tree, before);
        assert!(db.name.is_bound());
    }

    #[test]
    fn unsupported_versions_leave_key_untouched() {
        for bad in [
            Entry::leaf("version", 3i32).unwrap(),
            Entry::leaf("version", 0i32).unwrap(),
            Entry::leaf("version", -1i32).unwrap(),
            Entry::leaf("version", "2").unwrap(),
            Entry::leaf("version", 2i64).unwrap(),
            Entry::key("version").unwrap(),
        ] {
            let mut tree = Tree::new();
            let root = tree.root();
            place_at_path(&mut tree, root, "db", bad).unwrap();
            let before = tree.clone();

            let err = SchemaCodec::open_at(&mut tree, "db", &mut Db::new()).unwrap_err();
            assert!(
                matches!(err, MigrationError::UnsupportedSchemaVersion { schema: "db", supported: 2, .. }),
                "{:?}",
                err
            );
            assert_eq!(tree, before);
        }
    }

    #[test]
    fn failing_step_rolls_back() {
        let mut tree = v1_tree("dbname");
        let before = tree.clone();
        let mut db = Db::new();
        db.fail_at = Some(2);

        let err = SchemaCodec::open_at(&mut tree, "db", &mut db).unwrap_err();
        assert!(matches!(err, MigrationError::UnknownStep { version: 2, .. }));
        assert_eq!(tree, before);
    }

    #[test]
    fn failed_initialize_removes_created_key() {
        let mut tree = Tree::new();
        let mut db = Db::new();
        db.fail_at = Some(2);

        assert!(SchemaCodec::open_at(&mut tree, "db", &mut db).is_err());
        assert!(tree.is_empty());
    }

    #[test]
    fn failed_initialize_removes_created_parents() {
        let mut tree = Tree::new();
        let mut db = Db::new();
        db.fail_at = Some(2);

        assert!(SchemaCodec::open_at(&mut tree, "HKS/bots/discord", &mut db).is_err());
        assert_eq!(tree, Tree::new());
    }

    #[test]
    fn failed_initialize_keeps_existing_parents() {
        let mut tree = Tree::new();
        let root = tree.root();
        place_at_path(&mut tree, root, "HKS", Entry::leaf("other", 1i32).unwrap()).unwrap();
        let before = tree.clone();
        let mut db = Db::new();
        db.fail_at = Some(1);

        assert!(SchemaCodec::open_at(&mut tree, "HKS/bots/discord", &mut db).is_err());
        assert_eq!(tree, before);
        assert!(get_by_path(&tree, root, "HKS/other").is_some());
        assert!(get_by_path(&tree, root, "HKS/bots").is_none());
    }

    #[test]
    fn version_never_goes_down() {
        let mut tree = v1_tree("dbname");
        let root = tree.root();
        let key = get_by_path(&tree, root, "db").unwrap();
        SchemaCodec::record_version::<Db>(&mut tree, key, 2).unwrap();

        let err = SchemaCodec::record_version::<Db>(&mut tree, key, 1).unwrap_err();
        assert_eq!(
            err,
            MigrationError::VersionRegression {
                schema: "db",
                from: 2,
                to: 1
            }
        );
        assert_eq!(version_of(&tree, "db"), 2);
    }

    #[test]
    fn open_on_leaf_path_fails() {
        let mut tree = Tree::new();
        let root = tree.root();
        place_at_path(&mut tree, root, "", Entry::leaf("db", true).unwrap()).unwrap();
        assert!(matches!(
            SchemaCodec::open_at(&mut tree, "db", &mut Db::new()),
            Err(MigrationError::Entry(EntryError::NotAKey(_)))
        ));
    }
}
