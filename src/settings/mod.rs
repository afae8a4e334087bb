//! settings
//!
//! Built-in settings owners.
//!
//! Each owner keeps a versioned Key below the root; see [`crate::schema`]
//! for how those Keys are created and upgraded.

pub mod bots;
pub mod database;
pub mod sockets;

pub use bots::{DiscordAccount, SecondLifeAccount};
pub use database::{DatabaseKind, DatabaseSettings};
pub use sockets::SocketSettings;

use crate::hive::Registry;
use crate::schema::{MigrationError, MigrationOutcome, SchemaCodec, VersionedSchema};

/// Every built-in settings owner, bound to one registry.
#[derive(Debug, Default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub sockets: SocketSettings,
    pub discord: DiscordAccount,
    pub second_life: SecondLifeAccount,
}

/// What opening one owner did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenReport {
    pub schema: &'static str,
    pub path: &'static str,
    pub outcome: MigrationOutcome,
}

impl Settings {
    /// Open every built-in owner in `registry`, initializing or upgrading
    /// their Keys as needed.
    ///
    /// Owners are opened in a fixed order and each is independent: a
    /// failure leaves earlier owners' changes in place.
    pub fn open(registry: &Registry) -> Result<(Self, Vec<OpenReport>), MigrationError> {
        let mut settings = Settings::default();
        let mut tree = registry.lock();
        let reports = vec![
            open_one(&mut tree, database::PATH, &mut settings.database)?,
            open_one(&mut tree, sockets::PATH, &mut settings.sockets)?,
            open_one(&mut tree, DiscordAccount::PATH, &mut settings.discord)?,
            open_one(&mut tree, SecondLifeAccount::PATH, &mut settings.second_life)?,
        ];
        Ok((settings, reports))
    }
}

fn open_one<S: VersionedSchema>(
    tree: &mut crate::core::tree::Tree,
    path: &'static str,
    schema: &mut S,
) -> Result<OpenReport, MigrationError> {
    let outcome = SchemaCodec::open_at(tree, path, schema)?;
    Ok(OpenReport {
        schema: S::NAME,
        path,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::Tree;
    use crate::core::types::HiveName;

    #[test]
    fn open_twice_is_current_the_second_time() {
        let registry = Registry::new(HiveName::new("main").unwrap(), Tree::new());

        let (_, first) = Settings::open(&registry).unwrap();
        assert!(first.iter().all(|r| r.outcome.changed()));

        let (settings, second) = Settings::open(&registry).unwrap();
        assert!(second.iter().all(|r| !r.outcome.changed()));
        let paths: Vec<_> = second.iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![
                "HKS/database",
                "HKS/sockets",
                "HKS/bots/discord/account",
                "HKS/bots/secondlife/account"
            ]
        );

        let tree = registry.lock();
        assert_eq!(settings.sockets.http.get(&tree).unwrap(), 7790);
    }
}
