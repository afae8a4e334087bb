//! core::codec
//!
//! Binary hive format.
//!
//! # Layout
//!
//! ```text
//! major:    u8
//! minor:    u8
//! creator:  string
//! reserved: 16 bytes (zero; future flag bits)
//! tree:     [type:u8][name:string][payload], Root first
//! ```
//!
//! A string is a 7-bit varint byte length followed by UTF-8. Type bytes
//! run `Word = 0` through `Root = 6`. Scalar payloads are fixed width and
//! little-endian, a Bool is one byte, and a Key payload is a varint child
//! count followed by each child in order. See [`header`] and [`body`] for
//! the two halves.
//!
//! # Compatibility
//!
//! - Major differs: [`CodecError::IncompatibleFormat`], nothing is decoded
//! - Minor differs: decoding continues and a [`CompatibilityWarning`] is
//!   returned; the next save rewrites the file at the current minor
//!
//! # Example
//!
//! ```
//! use hivework::core::codec::{decode_hive, encode_hive};
//! use hivework::core::entry::Entry;
//! use hivework::core::path::place_at_path;
//! use hivework::core::tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.root();
//! place_at_path(&mut tree, root, "database", Entry::leaf("dbname", "harbinger").unwrap()).unwrap();
//!
//! let bytes = encode_hive(&tree, "doc-test").unwrap();
//! let decoded = decode_hive(&bytes).unwrap();
//! assert_eq!(decoded.tree, tree);
//! assert_eq!(decoded.header.creator, "doc-test");
//! assert!(decoded.warnings.is_empty());
//! ```

pub mod body;
pub mod header;
pub mod varint;

pub use header::{CompatibilityWarning, HiveHeader, FORMAT_MAJOR, FORMAT_MINOR, RESERVED_LEN};

use thiserror::Error;
use tracing::{debug, warn};

use super::tree::Tree;
use varint::decode_varint;

/// Deepest nesting the codec reads or writes, root included.
pub const MAX_DEPTH: usize = 512;

/// Errors from encoding or decoding hives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The file was written by an incompatible major format version.
    #[error("incompatible hive format: file major version {found}, supported {supported}")]
    IncompatibleFormat { found: u8, supported: u8 },

    /// The byte stream is truncated or malformed.
    #[error("corrupt hive data at byte {offset}: {reason}")]
    CorruptData { offset: usize, reason: String },

    /// The tree nests deeper than [`MAX_DEPTH`] and could not be read back.
    #[error("tree depth exceeds the format limit of {limit}")]
    TooDeep { limit: usize },
}

impl CodecError {
    pub(crate) fn corrupt(offset: usize, reason: impl Into<String>) -> Self {
        CodecError::CorruptData {
            offset,
            reason: reason.into(),
        }
    }
}

/// Bounds-checked cursor over an encoded hive.
pub(crate) struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    pub(crate) fn read_bytes(&mut self, len: usize, what: &str) -> Result<&'a [u8], CodecError> {
        if len > self.remaining() {
            return Err(CodecError::corrupt(
                self.pos,
                format!(
                    "truncated {}: need {} bytes, {} left",
                    what,
                    len,
                    self.remaining()
                ),
            ));
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub(crate) fn read_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, what)?);
        Ok(out)
    }

    pub(crate) fn read_u8(&mut self, what: &str) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>(what)?[0])
    }

    pub(crate) fn read_varint(&mut self) -> Result<u64, CodecError> {
        decode_varint(self.buf, &mut self.pos)
    }

    /// Read a varint length and that many UTF-8 bytes.
    pub(crate) fn read_string(&mut self, what: &str) -> Result<String, CodecError> {
        let start = self.pos;
        let len = self.read_varint()?;
        let len = usize::try_from(len)
            .map_err(|_| CodecError::corrupt(start, format!("{} length overflows", what)))?;
        let bytes = self.read_bytes(len, what)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| CodecError::corrupt(start, format!("{} is not UTF-8: {}", what, e)))
    }
}

/// Append a varint length and the UTF-8 bytes of `s`.
pub(crate) fn write_string(s: &str, buf: &mut Vec<u8>) {
    varint::encode_varint(s.len() as u64, buf);
    buf.extend_from_slice(s.as_bytes());
}

/// Result of decoding a hive.
#[derive(Debug)]
pub struct DecodedHive {
    /// The header as found in the file.
    pub header: HiveHeader,
    /// The materialized tree.
    pub tree: Tree,
    /// Recoverable compatibility notes (minor version drift).
    pub warnings: Vec<CompatibilityWarning>,
}

/// Serialize `tree` with a current-version header.
///
/// # Errors
///
/// Returns [`CodecError::TooDeep`] if the tree nests deeper than
/// [`MAX_DEPTH`].
pub fn encode_hive(tree: &Tree, creator: &str) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(64 + tree.len() * 16);
    HiveHeader::current(creator).write(&mut buf);
    body::encode_tree(tree, &mut buf)?;
    Ok(buf)
}

/// Parse only the header of an encoded hive.
pub fn read_header(bytes: &[u8]) -> Result<HiveHeader, CodecError> {
    HiveHeader::read(&mut ByteReader::new(bytes))
}

/// Decode a full hive: header, then the tree.
///
/// # Errors
///
/// - [`CodecError::IncompatibleFormat`] if the major version differs
/// - [`CodecError::CorruptData`] for truncated or malformed input,
///   including trailing bytes after the root
pub fn decode_hive(bytes: &[u8]) -> Result<DecodedHive, CodecError> {
    let mut reader = ByteReader::new(bytes);
    let header = HiveHeader::read(&mut reader)?;

    let mut warnings = Vec::new();
    if let Some(warning) = header.compatibility_warning() {
        warn!(
            found_minor = warning.found_minor,
            supported_minor = warning.supported_minor,
            "{}",
            warning.message
        );
        warnings.push(warning);
    }
    if header.has_reserved_flags() {
        debug!(reserved = ?header.reserved, "hive header carries reserved flag bits");
    }

    let tree = body::decode_tree(&mut reader)?;
    if !reader.is_at_end() {
        return Err(CodecError::corrupt(
            reader.position(),
            format!("{} trailing bytes after root", reader.remaining()),
        ));
    }

    Ok(DecodedHive {
        header,
        tree,
        warnings,
    })
}
