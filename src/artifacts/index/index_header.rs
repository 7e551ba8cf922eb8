use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::error::OrfError;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Fixed 12-byte index header: magic, version, entry count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHeader {
    pub version: u32,
    pub entries_count: u32,
}

impl IndexHeader {
    pub fn new(entries_count: u32) -> Self {
        IndexHeader {
            version: VERSION,
            entries_count,
        }
    }

    pub fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(SIGNATURE.as_bytes())?;
        bytes.write_u32::<NetworkEndian>(self.version)?;
        bytes.write_u32::<NetworkEndian>(self.entries_count)?;

        Ok(bytes)
    }

    pub fn deserialize(reader: &mut impl Read) -> anyhow::Result<Self> {
        let mut magic = [0u8; 4];
        reader
            .read_exact(&mut magic)
            .map_err(|_| OrfError::CorruptIndex("truncated header".to_string()))?;
        if &magic != SIGNATURE.as_bytes() {
            return Err(OrfError::CorruptIndex("bad magic".to_string()).into());
        }

        let version = reader.read_u32::<NetworkEndian>()?;
        if version != VERSION {
            return Err(
                OrfError::CorruptIndex(format!("unsupported version {version}")).into(),
            );
        }

        let entries_count = reader.read_u32::<NetworkEndian>()?;

        Ok(IndexHeader {
            version,
            entries_count,
        })
    }
}
