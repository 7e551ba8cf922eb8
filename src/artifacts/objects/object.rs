//! Core object traits and the on-disk frame
//!
//! Every object is persisted as a zlib-compressed frame:
//!
//! ```text
//! <type> SP <payload length, big-endian u32> NUL <payload>
//! ```
//!
//! The SHA-256 digest of the uncompressed frame is the object's identity.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::error::OrfError;
use anyhow::Result;
use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;

/// Serialization to an object payload
pub trait Packable {
    /// Serialize the object's payload (frame excluded)
    fn serialize(&self) -> Result<Bytes>;
}

/// Deserialization from an object payload
pub trait Unpackable {
    /// Rebuild the object from its payload (frame already stripped)
    fn deserialize(payload: Bytes) -> Result<Self>
    where
        Self: Sized;
}

/// Common operations over the four object kinds
pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Human-readable rendition for `cat`
    fn display(&self) -> String;

    /// Frame the payload for hashing and persistence
    fn frame(&self) -> Result<Bytes> {
        let payload = self.serialize()?;
        Ok(frame(self.object_type(), &payload))
    }

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::digest(&self.frame()?))
    }
}

/// Type-erased object returned by the database
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
    Tag(Box<Tag>),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
            ObjectBox::Tag(_) => ObjectType::Tag,
        }
    }

    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
            ObjectBox::Tag(tag) => tag.display(),
        }
    }
}

/// Build the on-disk frame for a payload
pub fn frame(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let mut frame = Vec::with_capacity(payload.len() + 12);
    frame.extend_from_slice(object_type.as_str().as_bytes());
    frame.push(b' ');

    let mut size = [0u8; 4];
    BigEndian::write_u32(&mut size, payload.len() as u32);
    frame.extend_from_slice(&size);

    frame.push(0);
    frame.extend_from_slice(payload);

    Bytes::from(frame)
}

/// Split a decompressed frame into its type and payload
///
/// Validates the declared big-endian size against the actual payload length
/// and the NUL separator after the size word.
pub fn parse_frame(frame: &Bytes) -> Result<(ObjectType, Bytes)> {
    let space = frame
        .iter()
        .position(|&byte| byte == b' ')
        .ok_or_else(|| OrfError::InvalidFrame("missing type delimiter".to_string()))?;

    let type_name = std::str::from_utf8(&frame[..space])
        .map_err(|_| OrfError::InvalidFrame("type name is not valid UTF-8".to_string()))?;
    let object_type = ObjectType::try_parse(type_name)?;

    let size_start = space + 1;
    let size_end = size_start + 4;
    if frame.len() < size_end + 1 {
        return Err(OrfError::InvalidFrame("truncated size field".to_string()).into());
    }

    let declared = BigEndian::read_u32(&frame[size_start..size_end]) as usize;

    if frame[size_end] != 0 {
        return Err(OrfError::InvalidFrame("missing NUL after size".to_string()).into());
    }

    let payload = frame.slice(size_end + 1..);
    if payload.len() != declared {
        return Err(OrfError::SizeMismatch {
            declared,
            actual: payload.len(),
        }
        .into());
    }

    Ok((object_type, payload))
}
