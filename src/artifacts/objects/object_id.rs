//! Object identifiers
//!
//! The canonical identity of an object is the lowercase hex SHA-256 digest
//! of its framed bytes (64 characters). Tree leaves and index entries
//! persist only the first 20 raw digest bytes, so those carry a [`ShortId`]
//! which the database resolves back to a full id by prefix lookup.

use anyhow::Context;
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex length of a full digest
pub const OBJECT_ID_LENGTH: usize = 64;

/// Hex length of the truncated wire form
pub const SHORT_ID_LENGTH: usize = 40;

/// Raw byte width of the truncated wire form
pub const SHORT_ID_BYTES: usize = 20;

/// Full 64-hex SHA-256 identity of a stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            anyhow::bail!("invalid object id length: {}", id.len());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("invalid object id characters: {id}");
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Digest a framed object
    pub fn digest(frame: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(frame);
        Self(hex::encode(hasher.finalize()))
    }

    /// Shard path below `objects/`: first two hex chars, then the rest
    pub fn to_path(&self) -> (String, String) {
        (self.0[..2].to_string(), self.0[2..].to_string())
    }

    /// Truncated wire form stored in tree leaves and index entries
    pub fn to_short(&self) -> ShortId {
        ShortId(self.0[..SHORT_ID_LENGTH].to_string())
    }

    /// Abbreviated form for display
    pub fn abbrev(&self) -> &str {
        &self.0[..8]
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Truncated 40-hex wire identity (first 20 digest bytes)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ShortId(String);

impl ShortId {
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != SHORT_ID_LENGTH {
            anyhow::bail!("invalid short id length: {}", id.len());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("invalid short id characters: {id}");
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Write the 20 raw bytes this id encodes
    pub fn write_raw_to(&self, output: &mut Vec<u8>) -> anyhow::Result<()> {
        let raw = hex::decode(&self.0).context("short id is not valid hex")?;
        output.extend_from_slice(&raw);
        Ok(())
    }

    /// Hex-encode a 20-byte raw digest slice
    pub fn from_raw(raw: &[u8]) -> anyhow::Result<Self> {
        if raw.len() != SHORT_ID_BYTES {
            anyhow::bail!("short id raw form must be {SHORT_ID_BYTES} bytes");
        }
        Ok(Self(hex::encode(raw)))
    }
}

impl AsRef<str> for ShortId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn digest_is_deterministic_and_lowercase() {
        let a = ObjectId::digest(b"blob payload");
        let b = ObjectId::digest(b"blob payload");

        assert_eq!(a, b);
        assert_eq!(a.as_ref().len(), OBJECT_ID_LENGTH);
        assert!(a.as_ref().chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn short_id_is_a_prefix_of_the_full_id() {
        let oid = ObjectId::digest(b"x\n");
        let short = oid.to_short();

        assert!(oid.as_ref().starts_with(short.as_ref()));
        assert_eq!(short.as_ref().len(), SHORT_ID_LENGTH);
    }

    #[test]
    fn short_id_round_trips_through_raw_bytes() {
        let short = ObjectId::digest(b"content").to_short();

        let mut raw = Vec::new();
        short.write_raw_to(&mut raw).unwrap();
        assert_eq!(raw.len(), SHORT_ID_BYTES);

        let reread = ShortId::from_raw(&raw).unwrap();
        assert_eq!(reread, short);
    }

    #[test]
    fn rejects_bad_lengths_and_characters() {
        assert!(ObjectId::try_parse("abc".to_string()).is_err());
        assert!(ObjectId::try_parse("z".repeat(OBJECT_ID_LENGTH)).is_err());
        assert!(ShortId::try_parse("1234".to_string()).is_err());
    }
}
