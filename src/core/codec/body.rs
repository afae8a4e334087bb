//! Tree body encoding.
//!
//! Each node is `[type:u8][name:string][payload]`. Scalars are
//! little-endian; a Key's payload is a varint child count followed by the
//! children. Decoding builds detached
//! [`Entry`] values first and only materializes a [`Tree`] once the whole
//! body has been read, so a corrupt file never yields a partial tree.

use super::varint::encode_varint;
use super::{write_string, ByteReader, CodecError, MAX_DEPTH};
use crate::core::entry::{Body, Entry};
use crate::core::tree::{EntryId, Tree, ROOT_NAME};
use crate::core::types::{EntryName, EntryType, Value};

/// Append the encoded tree, root first.
pub fn encode_tree(tree: &Tree, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    buf.push(EntryType::Root.tag());
    write_string(ROOT_NAME, buf);
    encode_children(tree, tree.root(), 1, buf)
}

fn encode_children(
    tree: &Tree,
    key: EntryId,
    depth: usize,
    buf: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let children = tree.children(key).unwrap_or(&[]);
    encode_varint(children.len() as u64, buf);
    for child in children {
        encode_node(tree, *child, depth + 1, buf)?;
    }
    Ok(())
}

fn encode_node(
    tree: &Tree,
    id: EntryId,
    depth: usize,
    buf: &mut Vec<u8>,
) -> Result<(), CodecError> {
    if depth > MAX_DEPTH {
        return Err(CodecError::TooDeep { limit: MAX_DEPTH });
    }
    let (Some(name), Some(ty)) = (tree.name(id), tree.entry_type(id)) else {
        return Ok(());
    };
    buf.push(ty.tag());
    write_string(name, buf);
    match tree.value(id) {
        Ok(value) => {
            encode_value(value, buf);
            Ok(())
        }
        Err(_) => encode_children(tree, id, depth, buf),
    }
}

fn encode_value(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Word(s) => write_string(s, buf),
        Value::Int16(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::Int32(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::Int64(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::Bool(v) => buf.push(u8::from(*v)),
    }
}

/// Read the root node and everything below it.
pub(crate) fn decode_tree(reader: &mut ByteReader<'_>) -> Result<Tree, CodecError> {
    let offset = reader.position();
    let tag = reader.read_u8("root type")?;
    if EntryType::from_tag(tag) != Some(EntryType::Root) {
        return Err(CodecError::corrupt(
            offset,
            format!("expected root node, found type byte {:#04x}", tag),
        ));
    }
    // The stored root name is informational; every tree's root is ROOT_NAME.
    reader.read_string("root name")?;
    let children = decode_children(reader, 1)?;
    Tree::from_children(children).map_err(|e| CodecError::corrupt(offset, e.to_string()))
}

fn decode_children(reader: &mut ByteReader<'_>, depth: usize) -> Result<Vec<Entry>, CodecError> {
    let offset = reader.position();
    let count = reader.read_varint()?;
    // Every node needs at least a type byte, a name length and one name byte.
    if count > (reader.remaining() / 3) as u64 {
        return Err(CodecError::corrupt(
            offset,
            format!(
                "child count {} exceeds the {} bytes left",
                count,
                reader.remaining()
            ),
        ));
    }
    let mut children = Vec::with_capacity(count as usize);
    for _ in 0..count {
        children.push(decode_node(reader, depth + 1)?);
    }
    Ok(children)
}

fn decode_node(reader: &mut ByteReader<'_>, depth: usize) -> Result<Entry, CodecError> {
    let offset = reader.position();
    if depth > MAX_DEPTH {
        return Err(CodecError::corrupt(
            offset,
            format!("nesting exceeds {} levels", MAX_DEPTH),
        ));
    }

    let tag = reader.read_u8("entry type")?;
    let ty = EntryType::from_tag(tag)
        .ok_or_else(|| CodecError::corrupt(offset, format!("unknown type byte {:#04x}", tag)))?;

    let name_offset = reader.position();
    let name = EntryName::new(reader.read_string("entry name")?)
        .map_err(|e| CodecError::corrupt(name_offset, e.to_string()))?;

    let value_offset = reader.position();
    let body = match ty {
        EntryType::Word => Body::Leaf(Value::Word(reader.read_string("word value")?)),
        EntryType::Int16 => Body::Leaf(Value::Int16(i16::from_le_bytes(
            reader.read_array("int16 value")?,
        ))),
        EntryType::Int32 => Body::Leaf(Value::Int32(i32::from_le_bytes(
            reader.read_array("int32 value")?,
        ))),
        EntryType::Int64 => Body::Leaf(Value::Int64(i64::from_le_bytes(
            reader.read_array("int64 value")?,
        ))),
        EntryType::Bool => match reader.read_u8("bool value")? {
            0 => Body::Leaf(Value::Bool(false)),
            1 => Body::Leaf(Value::Bool(true)),
            other => {
                return Err(CodecError::corrupt(
                    value_offset,
                    format!("bool byte must be 0 or 1, found {}", other),
                ))
            }
        },
        EntryType::Key => Body::Key(decode_children(reader, depth)?),
        EntryType::Root => {
            return Err(CodecError::corrupt(offset, "root node below the top level"))
        }
    };

    Entry::from_parts(name, body).map_err(|e| CodecError::corrupt(value_offset, e.to_string()))
}
