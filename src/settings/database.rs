//! settings::database
//!
//! Database connection settings, kept under `HKS/database`.
//!
//! | version | leaves introduced                                              |
//! |---------|----------------------------------------------------------------|
//! | 1       | `dbname = "Harbinger"`, `user = ""`, `pass = ""`, `host = ""`  |
//! | 2       | `dbtype = 1` (Int16, see [`DatabaseKind`])                     |

use std::fmt;

use crate::core::entry::EntryError;
use crate::core::tree::Tree;
use crate::schema::{Field, KeyScope, MigrationError, VersionedSchema};

/// Where these settings live below the root.
pub const PATH: &str = "HKS/database";

/// Backing store selected by the `dbtype` leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    Sqlite,
    Registry,
    MySql,
}

impl DatabaseKind {
    pub fn code(self) -> i16 {
        match self {
            DatabaseKind::Sqlite => 0,
            DatabaseKind::Registry => 1,
            DatabaseKind::MySql => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(DatabaseKind::Sqlite),
            1 => Some(DatabaseKind::Registry),
            2 => Some(DatabaseKind::MySql),
            _ => None,
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DatabaseKind::Sqlite => "sqlite",
            DatabaseKind::Registry => "registry",
            DatabaseKind::MySql => "mysql",
        })
    }
}

#[derive(Debug)]
pub struct DatabaseSettings {
    pub dbname: Field<String>,
    pub user: Field<String>,
    pub pass: Field<String>,
    pub host: Field<String>,
    pub dbtype: Field<i16>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            dbname: Field::new("dbname"),
            user: Field::new("user"),
            pass: Field::new("pass"),
            host: Field::new("host"),
            dbtype: Field::new("dbtype"),
        }
    }
}

impl DatabaseSettings {
    /// The configured backing store, or `None` for a code this build does
    /// not know.
    pub fn kind(&self, tree: &Tree) -> Result<Option<DatabaseKind>, EntryError> {
        Ok(DatabaseKind::from_code(self.dbtype.get(tree)?))
    }

    pub fn set_kind(&self, tree: &mut Tree, kind: DatabaseKind) -> Result<(), EntryError> {
        self.dbtype.set(tree, kind.code())
    }
}

impl VersionedSchema for DatabaseSettings {
    const NAME: &'static str = "database";
    const CURRENT_VERSION: u32 = 2;

    fn activate(&mut self, key: &mut KeyScope<'_>, version: u32) -> Result<(), MigrationError> {
        match version {
            1 => {
                key.introduce(&self.dbname, "Harbinger".to_string())?;
                key.introduce(&self.user, String::new())?;
                key.introduce(&self.pass, String::new())?;
                key.introduce(&self.host, String::new())
            }
            2 => key.introduce(&self.dbtype, DatabaseKind::Registry.code()),
            _ => Err(MigrationError::unknown_step::<Self>(version)),
        }
    }

    fn bind(&mut self, key: &KeyScope<'_>) -> Result<(), MigrationError> {
        key.bind(&mut self.dbname)?;
        key.bind(&mut self.user)?;
        key.bind(&mut self.pass)?;
        key.bind(&mut self.host)?;
        key.bind(&mut self.dbtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::Entry;
    use crate::core::path::{get_by_path, place_at_path};
    use crate::schema::{MigrationOutcome, SchemaCodec};

    #[test]
    fn fresh_tree_gets_all_defaults() {
        let mut tree = Tree::new();
        let mut db = DatabaseSettings::default();
        let outcome = SchemaCodec::open_at(&mut tree, PATH, &mut db).unwrap();

        assert_eq!(outcome, MigrationOutcome::Initialized { to: 2 });
        assert_eq!(db.dbname.get(&tree).unwrap(), "Harbinger");
        assert_eq!(db.user.get(&tree).unwrap(), "");
        assert_eq!(db.pass.get(&tree).unwrap(), "");
        assert_eq!(db.host.get(&tree).unwrap(), "");
        assert_eq!(db.kind(&tree).unwrap(), Some(DatabaseKind::Registry));
    }

    #[test]
    fn v1_subtree_upgrades_in_place() {
        let mut tree = Tree::new();
        let root = tree.root();
        place_at_path(&mut tree, root, PATH, Entry::leaf("version", 1i32).unwrap()).unwrap();
        place_at_path(&mut tree, root, PATH, Entry::leaf("dbname", "legacy").unwrap()).unwrap();

        let mut db = DatabaseSettings::default();
        let outcome = SchemaCodec::open_at(&mut tree, PATH, &mut db).unwrap();

        assert_eq!(outcome, MigrationOutcome::Upgraded { from: 1, to: 2 });
        assert_eq!(db.dbname.get(&tree).unwrap(), "legacy");
        assert_eq!(db.dbtype.get(&tree).unwrap(), 1);
        let version = get_by_path(&tree, root, "HKS/database/version").unwrap();
        assert_eq!(tree.int32(version).unwrap(), 2);
    }

    #[test]
    fn kind_round_trips_and_rejects_unknown_codes() {
        let mut tree = Tree::new();
        let mut db = DatabaseSettings::default();
        SchemaCodec::open_at(&mut tree, PATH, &mut db).unwrap();

        db.set_kind(&mut tree, DatabaseKind::MySql).unwrap();
        assert_eq!(db.kind(&tree).unwrap(), Some(DatabaseKind::MySql));
        assert_eq!(db.dbtype.get(&tree).unwrap(), 2);

        db.dbtype.set(&mut tree, 9).unwrap();
        assert_eq!(db.kind(&tree).unwrap(), None);
    }
}
