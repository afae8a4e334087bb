//! settings::bots
//!
//! Chat bot account credentials.

use crate::schema::{Field, KeyScope, MigrationError, VersionedSchema};

/// Discord bot login, kept under [`DiscordAccount::PATH`].
#[derive(Debug)]
pub struct DiscordAccount {
    pub token: Field<String>,
}

impl DiscordAccount {
    pub const PATH: &'static str = "HKS/bots/discord/account";
}

impl Default for DiscordAccount {
    fn default() -> Self {
        Self {
            token: Field::new("token"),
        }
    }
}

impl VersionedSchema for DiscordAccount {
    const NAME: &'static str = "discord_account";
    const CURRENT_VERSION: u32 = 1;

    fn activate(&mut self, key: &mut KeyScope<'_>, version: u32) -> Result<(), MigrationError> {
        match version {
            1 => key.introduce(&self.token, "0123".to_string()),
            _ => Err(MigrationError::unknown_step::<Self>(version)),
        }
    }

    fn bind(&mut self, key: &KeyScope<'_>) -> Result<(), MigrationError> {
        key.bind(&mut self.token)
    }
}

/// Second Life avatar login, kept under [`SecondLifeAccount::PATH`].
#[derive(Debug)]
pub struct SecondLifeAccount {
    pub first: Field<String>,
    pub last: Field<String>,
    pub pass: Field<String>,
}

impl SecondLifeAccount {
    pub const PATH: &'static str = "HKS/bots/secondlife/account";
}

impl Default for SecondLifeAccount {
    fn default() -> Self {
        Self {
            first: Field::new("first"),
            last: Field::new("last"),
            pass: Field::new("pass"),
        }
    }
}

impl VersionedSchema for SecondLifeAccount {
    const NAME: &'static str = "secondlife_account";
    const CURRENT_VERSION: u32 = 1;

    fn activate(&mut self, key: &mut KeyScope<'_>, version: u32) -> Result<(), MigrationError> {
        match version {
            1 => {
                key.introduce(&self.first, "FName".to_string())?;
                key.introduce(&self.last, "LName".to_string())?;
                key.introduce(&self.pass, "Password01".to_string())
            }
            _ => Err(MigrationError::unknown_step::<Self>(version)),
        }
    }

    fn bind(&mut self, key: &KeyScope<'_>) -> Result<(), MigrationError> {
        key.bind(&mut self.first)?;
        key.bind(&mut self.last)?;
        key.bind(&mut self.pass)
    }
}
