//! settings::sockets
//!
//! Listener ports, kept under `HKS/sockets`.

use crate::schema::{Field, KeyScope, MigrationError, VersionedSchema};

/// Where these settings live below the root.
pub const PATH: &str = "HKS/sockets";

pub const DEFAULT_HTTP_PORT: i32 = 7790;
pub const DEFAULT_TCP_PORT: i32 = 7791;
pub const DEFAULT_UDP_PORT: i32 = 7792;

/// Socket server ports.
///
/// v1 stored a single `port`. v2 renames it to `http`, keeping whatever
/// value was stored, and adds `tcp` and `udp`.
#[derive(Debug)]
pub struct SocketSettings {
    pub http: Field<i32>,
    pub tcp: Field<i32>,
    pub udp: Field<i32>,
}

impl Default for SocketSettings {
    fn default() -> Self {
        Self {
            http: Field::new("http"),
            tcp: Field::new("tcp"),
            udp: Field::new("udp"),
        }
    }
}

/// Name of the v1 leaf that became `http`.
const LEGACY_PORT: &str = "port";

impl VersionedSchema for SocketSettings {
    const NAME: &'static str = "sockets";
    const CURRENT_VERSION: u32 = 2;

    fn activate(&mut self, key: &mut KeyScope<'_>, version: u32) -> Result<(), MigrationError> {
        match version {
            1 => key.introduce(&Field::<i32>::new(LEGACY_PORT), DEFAULT_HTTP_PORT),
            2 => {
                if !key.rename(LEGACY_PORT, &self.http)? {
                    key.introduce(&self.http, DEFAULT_HTTP_PORT)?;
                }
                key.introduce(&self.tcp, DEFAULT_TCP_PORT)?;
                key.introduce(&self.udp, DEFAULT_UDP_PORT)
            }
            _ => Err(MigrationError::unknown_step::<Self>(version)),
        }
    }

    fn bind(&mut self, key: &KeyScope<'_>) -> Result<(), MigrationError> {
        key.bind(&mut self.http)?;
        key.bind(&mut self.tcp)?;
        key.bind(&mut self.udp)
    }
}
