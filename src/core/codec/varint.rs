//! LEB128 variable-length unsigned integers.
//!
//! Used for string lengths and Key child counts.

use super::CodecError;

/// Longest valid encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Encode an unsigned 64-bit integer as LEB128 into `buf`.
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Decode a LEB128 unsigned 64-bit integer from `buf` starting at `*pos`.
/// Advances `*pos` past the consumed bytes.
pub fn decode_varint(buf: &[u8], pos: &mut usize) -> Result<u64, CodecError> {
    let start = *pos;
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    loop {
        let Some(&byte) = buf.get(*pos) else {
            return Err(CodecError::corrupt(start, "truncated varint"));
        };
        *pos += 1;

        let payload = (byte & 0x7F) as u64;
        // The tenth byte may only carry the top bit of a u64.
        if shift >= 63 && payload > 1 {
            return Err(CodecError::corrupt(start, "varint overflow"));
        }
        result |= payload << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if *pos - start >= MAX_VARINT_LEN {
            return Err(CodecError::corrupt(start, "varint overflow"));
        }
    }
}
