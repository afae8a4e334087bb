//! core::types
//!
//! Strong types for core registry concepts.
//!
//! # Types
//!
//! - [`EntryName`] - Validated sibling name of a registry entry
//! - [`HiveName`] - Validated name of an independently stored hive
//! - [`EntryType`] - Closed tag of every node variant, with its persisted byte
//! - [`Value`] - Scalar payload of a leaf entry
//! - [`LeafValue`] - Rust types that map onto exactly one leaf variant
//!
//! # Validation
//!
//! Names enforce validity at construction time. Invalid values
//! cannot be represented, so path and file handling never has to
//! re-check them.
//!
//! # Examples
//!
//! ```
//! use hivework::core::types::{EntryName, EntryType, HiveName, Value};
//!
//! let name = EntryName::new("http_server").unwrap();
//! assert_eq!(name.as_str(), "http_server");
//! assert!(EntryName::new("a/b").is_err());
//!
//! assert!(HiveName::new("main").is_ok());
//! assert!(HiveName::new("../escape").is_err());
//!
//! let port = Value::Int32(7768);
//! assert_eq!(port.entry_type(), EntryType::Int32);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of an entry name in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid entry name: {0}")]
    InvalidEntryName(String),

    #[error("invalid hive name: {0}")]
    InvalidHiveName(String),

    #[error("unknown entry type '{0}'")]
    UnknownType(String),

    #[error("cannot parse '{input}' as {ty}: {reason}")]
    InvalidValue {
        ty: EntryType,
        input: String,
        reason: String,
    },
}

/// A validated entry name.
///
/// Entry names must be unique among the siblings of a Key. They:
/// - Cannot be empty
/// - Cannot be longer than [`MAX_NAME_LEN`] bytes
/// - Cannot contain `/` (the path delimiter)
/// - Cannot contain ASCII control characters
///
/// Dots are allowed, so `"v1.settings"` is a single segment.
///
/// # Example
///
/// ```
/// use hivework::core::types::EntryName;
///
/// assert!(EntryName::new("discord").is_ok());
/// assert!(EntryName::new("v1.settings").is_ok());
/// assert!(EntryName::new("").is_err());
/// assert!(EntryName::new("tab\there").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryName(String);

impl EntryName {
    /// Create a new validated entry name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidEntryName` if the name breaks the rules above.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidEntryName(
                "entry name cannot be empty".into(),
            ));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(TypeError::InvalidEntryName(format!(
                "entry name is {} bytes, maximum is {}",
                name.len(),
                MAX_NAME_LEN
            )));
        }
        if name.contains('/') {
            return Err(TypeError::InvalidEntryName(format!(
                "'{}' contains the path delimiter '/'",
                name
            )));
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return Err(TypeError::InvalidEntryName(format!(
                "'{}' contains control characters",
                name.escape_debug()
            )));
        }
        Ok(())
    }

    /// Name of a tree's root node.
    pub(crate) fn root() -> Self {
        Self(crate::core::tree::ROOT_NAME.to_string())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EntryName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EntryName {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntryName> for String {
    fn from(name: EntryName) -> Self {
        name.0
    }
}

/// A validated hive name.
///
/// Hive names become file stems inside the data directory, so they are
/// restricted to `[A-Za-z0-9_.-]`, must not start with `.`, and are at most
/// 64 bytes.
///
/// # Example
///
/// ```
/// use hivework::core::types::HiveName;
///
/// let hive = HiveName::new("plugins-v2").unwrap();
/// assert_eq!(hive.as_str(), "plugins-v2");
/// assert!(HiveName::new(".hidden").is_err());
/// assert!(HiveName::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HiveName(String);

impl HiveName {
    /// Maximum hive name length in bytes.
    pub const MAX_LEN: usize = 64;

    /// Create a new validated hive name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidHiveName` for empty, overlong, dot-prefixed
    /// or otherwise unsafe names.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::InvalidHiveName("hive name cannot be empty".into()));
        }
        if name.len() > Self::MAX_LEN {
            return Err(TypeError::InvalidHiveName(format!(
                "hive name is {} bytes, maximum is {}",
                name.len(),
                Self::MAX_LEN
            )));
        }
        if name.starts_with('.') {
            return Err(TypeError::InvalidHiveName(
                "hive name cannot start with '.'".into(),
            ));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(TypeError::InvalidHiveName(format!(
                "'{}' contains invalid character '{}'",
                name,
                bad.escape_debug()
            )));
        }
        Ok(Self(name))
    }

    /// The process-wide default hive, `main`.
    pub fn default_hive() -> Self {
        Self("main".to_string())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HiveName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for HiveName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HiveName> for String {
    fn from(name: HiveName) -> Self {
        name.0
    }
}

/// Closed tag of every registry node variant.
///
/// The discriminant byte is what the binary codec persists; it must never
/// change for an existing variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Word,
    Int16,
    Int32,
    Int64,
    Bool,
    Key,
    Root,
}

impl EntryType {
    /// All variants in tag order.
    pub const ALL: [EntryType; 7] = [
        EntryType::Word,
        EntryType::Int16,
        EntryType::Int32,
        EntryType::Int64,
        EntryType::Bool,
        EntryType::Key,
        EntryType::Root,
    ];

    /// The persisted type byte.
    pub const fn tag(self) -> u8 {
        match self {
            EntryType::Word => 0,
            EntryType::Int16 => 1,
            EntryType::Int32 => 2,
            EntryType::Int64 => 3,
            EntryType::Bool => 4,
            EntryType::Key => 5,
            EntryType::Root => 6,
        }
    }

    /// Map a persisted type byte back to its variant.
    ///
    /// Returns `None` for unrecognized bytes.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// Whether nodes of this type hold children.
    pub fn is_container(self) -> bool {
        matches!(self, EntryType::Key | EntryType::Root)
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Word => "word",
            EntryType::Int16 => "int16",
            EntryType::Int32 => "int32",
            EntryType::Int64 => "int64",
            EntryType::Bool => "bool",
            EntryType::Key => "key",
            EntryType::Root => "root",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" | "string" => Ok(EntryType::Word),
            "int16" => Ok(EntryType::Int16),
            "int32" | "int" => Ok(EntryType::Int32),
            "int64" | "long" => Ok(EntryType::Int64),
            "bool" | "boolean" => Ok(EntryType::Bool),
            "key" => Ok(EntryType::Key),
            "root" => Ok(EntryType::Root),
            _ => Err(TypeError::UnknownType(s.to_string())),
        }
    }
}

/// Scalar payload of a leaf entry.
///
/// One case per scalar [`EntryType`]; there is no dynamically typed setter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Word(String),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Bool(bool),
}

impl Value {
    /// The entry type this value belongs to.
    pub fn entry_type(&self) -> EntryType {
        match self {
            Value::Word(_) => EntryType::Word,
            Value::Int16(_) => EntryType::Int16,
            Value::Int32(_) => EntryType::Int32,
            Value::Int64(_) => EntryType::Int64,
            Value::Bool(_) => EntryType::Bool,
        }
    }

    /// The zero value of a scalar type, or `None` for containers.
    pub fn default_for(ty: EntryType) -> Option<Value> {
        match ty {
            EntryType::Word => Some(Value::Word(String::new())),
            EntryType::Int16 => Some(Value::Int16(0)),
            EntryType::Int32 => Some(Value::Int32(0)),
            EntryType::Int64 => Some(Value::Int64(0)),
            EntryType::Bool => Some(Value::Bool(false)),
            EntryType::Key | EntryType::Root => None,
        }
    }

    /// Parse user input as a value of the given scalar type.
    ///
    /// # Example
    ///
    /// ```
    /// use hivework::core::types::{EntryType, Value};
    ///
    /// assert_eq!(Value::parse(EntryType::Int16, "-12").unwrap(), Value::Int16(-12));
    /// assert_eq!(Value::parse(EntryType::Bool, "yes").unwrap(), Value::Bool(true));
    /// assert!(Value::parse(EntryType::Int16, "70000").is_err());
    /// ```
    pub fn parse(ty: EntryType, input: &str) -> Result<Value, TypeError> {
        let invalid = |reason: String| TypeError::InvalidValue {
            ty,
            input: input.to_string(),
            reason,
        };
        match ty {
            EntryType::Word => Ok(Value::Word(input.to_string())),
            EntryType::Int16 => input
                .trim()
                .parse()
                .map(Value::Int16)
                .map_err(|e| invalid(e.to_string())),
            EntryType::Int32 => input
                .trim()
                .parse()
                .map(Value::Int32)
                .map_err(|e| invalid(e.to_string())),
            EntryType::Int64 => input
                .trim()
                .parse()
                .map(Value::Int64)
                .map_err(|e| invalid(e.to_string())),
            EntryType::Bool => match input.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
                _ => Err(invalid("expected true or false".into())),
            },
            EntryType::Key | EntryType::Root => Err(invalid("containers hold no value".into())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Word(s) => write!(f, "{}", s),
            Value::Int16(n) => write!(f, "{}", n),
            Value::Int32(n) => write!(f, "{}", n),
            Value::Int64(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Word(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Word(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// A Rust type stored in exactly one leaf variant.
///
/// Used by typed accessors and schema field handles so callers never
/// match on [`Value`] themselves.
pub trait LeafValue: Sized + Clone {
    /// The leaf variant holding this type.
    const TYPE: EntryType;

    /// Extract from a value of the matching variant.
    fn from_value(value: &Value) -> Option<Self>;

    /// Wrap into the matching variant.
    fn into_value(self) -> Value;
}

macro_rules! leaf_value {
    ($ty:ty, $variant:ident) => {
        impl LeafValue for $ty {
            const TYPE: EntryType = EntryType::$variant;

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

leaf_value!(String, Word);
leaf_value!(i16, Int16);
leaf_value!(i32, Int32);
leaf_value!(i64, Int64);
leaf_value!(bool, Bool);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_name_rules() {
        assert!(EntryName::new("version").is_ok());
        assert!(EntryName::new("with space").is_ok());
        assert!(EntryName::new("dotted.name").is_ok());

        assert!(EntryName::new("").is_err());
        assert!(EntryName::new("a/b").is_err());
        assert!(EntryName::new("nul\0").is_err());
        assert!(EntryName::new("x".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(EntryName::new("x".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn hive_name_rules() {
        assert!(HiveName::new("main").is_ok());
        assert!(HiveName::new("plugin_store-2.bak").is_ok());

        assert!(HiveName::new("").is_err());
        assert!(HiveName::new(".main").is_err());
        assert!(HiveName::new("a\\b").is_err());
        assert!(HiveName::new("sp ace").is_err());
        assert!(HiveName::new("h".repeat(HiveName::MAX_LEN + 1)).is_err());
    }

    #[test]
    fn tags_are_unique_and_round_trip() {
        for ty in EntryType::ALL {
            assert_eq!(EntryType::from_tag(ty.tag()), Some(ty));
        }
        let mut tags: Vec<u8> = EntryType::ALL.iter().map(|t| t.tag()).collect();
        tags.dedup();
        assert_eq!(tags.len(), EntryType::ALL.len());
    }

    #[test]
    fn tag_numbering_is_fixed() {
        assert_eq!(EntryType::from_tag(0), Some(EntryType::Word));
        assert_eq!(EntryType::from_tag(6), Some(EntryType::Root));
        assert_eq!(EntryType::from_tag(7), None);
        assert_eq!(EntryType::from_tag(0xFF), None);
    }

    #[test]
    fn entry_type_from_str() {
        assert_eq!("Int32".parse::<EntryType>().unwrap(), EntryType::Int32);
        assert_eq!("string".parse::<EntryType>().unwrap(), EntryType::Word);
        assert!("float".parse::<EntryType>().is_err());
    }

    #[test]
    fn defaults_only_for_scalars() {
        assert_eq!(Value::default_for(EntryType::Word), Some(Value::Word(String::new())));
        assert_eq!(Value::default_for(EntryType::Bool), Some(Value::Bool(false)));
        assert_eq!(Value::default_for(EntryType::Key), None);
        assert_eq!(Value::default_for(EntryType::Root), None);
    }

    #[test]
    fn parse_rejects_out_of_range() {
        assert!(Value::parse(EntryType::Int16, "32768").is_err());
        assert_eq!(
            Value::parse(EntryType::Int64, " 9000000000 ").unwrap(),
            Value::Int64(9_000_000_000)
        );
        assert!(Value::parse(EntryType::Bool, "maybe").is_err());
        assert!(Value::parse(EntryType::Key, "x").is_err());
    }

    #[test]
    fn leaf_value_mapping() {
        assert_eq!(<i32 as LeafValue>::TYPE, EntryType::Int32);
        assert_eq!(i32::from_value(&Value::Int32(5)), Some(5));
        assert_eq!(i32::from_value(&Value::Int64(5)), None);
        assert_eq!(String::from("x").into_value(), Value::Word("x".into()));
    }

    #[test]
    fn serde_names_are_validated() {
        let ok: EntryName = serde_json::from_str("\"port\"").unwrap();
        assert_eq!(ok.as_str(), "port");
        assert!(serde_json::from_str::<EntryName>("\"a/b\"").is_err());
    }
}
