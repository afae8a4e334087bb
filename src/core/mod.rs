//! core
//!
//! The registry model, its binary format and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: EntryName, HiveName, EntryType, Value
//! - [`entry`] - Detached entries and entry errors
//! - [`tree`] - The attached, id-addressed registry tree
//! - [`path`] - Path lookup and placement
//! - [`codec`] - Binary hive format
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid names and values at construction
//! - Failed operations leave the tree unchanged
//! - Decoding never yields a partial tree

pub mod codec;
pub mod config;
pub mod entry;
pub mod path;
pub mod tree;
pub mod types;
