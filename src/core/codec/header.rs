//! Hive file header.

use super::{write_string, ByteReader, CodecError};

/// Major format version this build reads and writes.
pub const FORMAT_MAJOR: u8 = 1;

/// Minor format version this build writes.
pub const FORMAT_MINOR: u8 = 1;

/// Size of the reserved flag area.
pub const RESERVED_LEN: usize = 16;

/// The fixed header at the start of every hive file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiveHeader {
    pub major: u8,
    pub minor: u8,
    /// Free-form signature of the program that wrote the file.
    pub creator: String,
    /// Reserved for future bitmask flags; written as zero.
    pub reserved: [u8; RESERVED_LEN],
}

/// A recoverable minor-version difference found while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityWarning {
    pub found_minor: u8,
    pub supported_minor: u8,
    pub message: String,
}

impl HiveHeader {
    /// Header for a file written by this build.
    pub fn current(creator: &str) -> Self {
        Self {
            major: FORMAT_MAJOR,
            minor: FORMAT_MINOR,
            creator: creator.to_string(),
            reserved: [0; RESERVED_LEN],
        }
    }

    pub(crate) fn write(&self, buf: &mut Vec<u8>) {
        buf.push(self.major);
        buf.push(self.minor);
        write_string(&self.creator, buf);
        buf.extend_from_slice(&self.reserved);
    }

    /// Read a header, refusing other major versions before reading further.
    pub(crate) fn read(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let major = reader.read_u8("format major")?;
        if major != FORMAT_MAJOR {
            return Err(CodecError::IncompatibleFormat {
                found: major,
                supported: FORMAT_MAJOR,
            });
        }
        let minor = reader.read_u8("format minor")?;
        let creator = reader.read_string("creator signature")?;
        let reserved = reader.read_array::<RESERVED_LEN>("reserved header bytes")?;
        Ok(Self {
            major,
            minor,
            creator,
            reserved,
        })
    }

    /// A warning if the file's minor version differs from ours.
    pub fn compatibility_warning(&self) -> Option<CompatibilityWarning> {
        if self.minor == FORMAT_MINOR {
            return None;
        }
        let message = if self.minor < FORMAT_MINOR {
            format!(
                "hive was written at format {}.{}, current is {}.{}; missing defaults are filled in on access and the file is upgraded on next save",
                self.major, self.minor, FORMAT_MAJOR, FORMAT_MINOR
            )
        } else {
            format!(
                "hive was written at newer format {}.{}, current is {}.{}; it will be rewritten at {}.{} on next save",
                self.major, self.minor, FORMAT_MAJOR, FORMAT_MINOR, FORMAT_MAJOR, FORMAT_MINOR
            )
        };
        Some(CompatibilityWarning {
            found_minor: self.minor,
            supported_minor: FORMAT_MINOR,
            message,
        })
    }

    /// Whether any reserved byte is non-zero.
    pub fn has_reserved_flags(&self) -> bool {
        self.reserved.iter().any(|b| *b != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_fixed() {
        let mut buf = Vec::new();
        HiveHeader::current("ab").write(&mut buf);

        assert_eq!(buf[0], FORMAT_MAJOR);
        assert_eq!(buf[1], FORMAT_MINOR);
        assert_eq!(buf[2], 2);
        assert_eq!(&buf[3..5], b"ab");
        assert_eq!(&buf[5..], &[0u8; RESERVED_LEN]);
    }

    #[test]
    fn major_checked_before_rest() {
        // A lone foreign major byte is reported as incompatible, not truncated.
        let err = HiveHeader::read(&mut ByteReader::new(&[9])).unwrap_err();
        assert_eq!(
            err,
            CodecError::IncompatibleFormat {
                found: 9,
                supported: FORMAT_MAJOR
            }
        );
    }

    #[test]
    fn reserved_bytes_are_kept() {
        let mut header = HiveHeader::current("x");
        header.reserved[3] = 0b1000;
        let mut buf = Vec::new();
        header.write(&mut buf);

        let read = HiveHeader::read(&mut ByteReader::new(&buf)).unwrap();
        assert_eq!(read, header);
        assert!(read.has_reserved_flags());
    }

    #[test]
    fn warning_for_both_directions() {
        let mut older = HiveHeader::current("x");
        older.minor = FORMAT_MINOR - 1;
        assert!(older.compatibility_warning().unwrap().message.contains("upgraded"));

        let mut newer = HiveHeader::current("x");
        newer.minor = FORMAT_MINOR + 1;
        assert!(newer.compatibility_warning().is_some());

        assert!(HiveHeader::current("x").compatibility_warning().is_none());
    }
}
