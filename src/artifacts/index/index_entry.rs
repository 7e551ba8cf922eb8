//! Index entry codec
//!
//! Each entry is a fixed 62-byte stat block, the 20-byte content digest and
//! flags word included, followed by the NUL-terminated path and NUL padding
//! so every record is a multiple of eight bytes long. All integers are
//! big-endian.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::{ShortId, SHORT_ID_BYTES};
use crate::error::OrfError;
use bitflags::bitflags;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use derive_new::new;
use std::fs::Metadata;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Records align to this block size
pub const ENTRY_BLOCK: usize = 8;

/// Fixed byte length before the path
pub const ENTRY_FIXED_SIZE: usize = 62;

/// Largest path length encodable in the flags word
pub const MAX_NAME_LENGTH: usize = 0xFFF - 1;

bitflags! {
    /// Boolean bits of the flags word; bits 13-12 hold the stage and
    /// bits 11-0 the name length.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntryFlags: u16 {
        const ASSUME_VALID = 1 << 15;
        const EXTENDED = 1 << 14;
    }
}

const STAGE_SHIFT: u16 = 12;
const STAGE_MASK: u16 = 0b0011 << STAGE_SHIFT;
const NAME_LENGTH_MASK: u16 = 0x0FFF;

/// Stat cache captured when a file is staged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: EntryMode,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl EntryMetadata {
    /// Nanosecond-resolution (ctime, mtime) pair for change detection
    pub fn timestamps(&self) -> (u128, u128) {
        (
            self.ctime as u128 * 1_000_000_000 + self.ctime_nsec as u128,
            self.mtime as u128 * 1_000_000_000 + self.mtime_nsec as u128,
        )
    }
}

#[cfg(unix)]
impl From<(&Path, &Metadata)> for EntryMetadata {
    fn from((path, metadata): (&Path, &Metadata)) -> Self {
        use std::os::unix::fs::MetadataExt;

        EntryMetadata {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode: EntryMode::from_file(path, metadata),
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        }
    }
}

/// One staged path
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// Path relative to the worktree root
    pub name: PathBuf,
    /// Truncated digest of the staged blob
    pub id: ShortId,
    pub metadata: EntryMetadata,
    #[new(default)]
    pub assume_valid: bool,
    #[new(default)]
    pub stage: u8,
}

impl IndexEntry {
    /// Encode the record, padded to an [`ENTRY_BLOCK`] multiple
    pub fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        let name = self
            .name
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("entry name is not valid UTF-8: {:?}", self.name))?;
        if name.len() > MAX_NAME_LENGTH {
            anyhow::bail!("entry name too long for the flags word: {name:?}");
        }

        let mut bytes = Vec::with_capacity(ENTRY_FIXED_SIZE + name.len() + ENTRY_BLOCK);
        bytes.write_u32::<NetworkEndian>(self.metadata.ctime)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.ctime_nsec)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.mtime)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.mtime_nsec)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.dev)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.ino)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.mode.as_word())?;
        bytes.write_u32::<NetworkEndian>(self.metadata.uid)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.gid)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.size)?;
        self.id.write_raw_to(&mut bytes)?;

        let mut flags = EntryFlags::empty();
        flags.set(EntryFlags::ASSUME_VALID, self.assume_valid);
        let flags_word = flags.bits()
            | ((self.stage as u16) << STAGE_SHIFT) & STAGE_MASK
            | name.len() as u16;
        bytes.write_u16::<NetworkEndian>(flags_word)?;

        bytes.write_all(name.as_bytes())?;
        bytes.push(0);
        while bytes.len() % ENTRY_BLOCK != 0 {
            bytes.push(0);
        }

        Ok(bytes)
    }

    /// Decode one record, consuming its padding
    pub fn deserialize(reader: &mut impl Read) -> anyhow::Result<Self> {
        let ctime = reader.read_u32::<NetworkEndian>()?;
        let ctime_nsec = reader.read_u32::<NetworkEndian>()?;
        let mtime = reader.read_u32::<NetworkEndian>()?;
        let mtime_nsec = reader.read_u32::<NetworkEndian>()?;
        let dev = reader.read_u32::<NetworkEndian>()?;
        let ino = reader.read_u32::<NetworkEndian>()?;
        let mode = EntryMode::try_from_word(reader.read_u32::<NetworkEndian>()?)?;
        let uid = reader.read_u32::<NetworkEndian>()?;
        let gid = reader.read_u32::<NetworkEndian>()?;
        let size = reader.read_u32::<NetworkEndian>()?;

        let mut raw_id = [0u8; SHORT_ID_BYTES];
        reader.read_exact(&mut raw_id)?;
        let id = ShortId::from_raw(&raw_id)?;

        let flags_word = reader.read_u16::<NetworkEndian>()?;
        let flags = EntryFlags::from_bits_retain(flags_word & !(STAGE_MASK | NAME_LENGTH_MASK));
        if flags.contains(EntryFlags::EXTENDED) {
            return Err(OrfError::CorruptIndex("extended flags not implemented".to_string()).into());
        }
        let stage = ((flags_word & STAGE_MASK) >> STAGE_SHIFT) as u8;
        let name_length = (flags_word & NAME_LENGTH_MASK) as usize;
        if name_length == NAME_LENGTH_MASK as usize {
            return Err(
                OrfError::CorruptIndex("overlong name length not implemented".to_string()).into(),
            );
        }

        let mut name_bytes = vec![0u8; name_length + 1];
        reader.read_exact(&mut name_bytes)?;
        if name_bytes.pop() != Some(0) {
            return Err(
                OrfError::CorruptIndex("entry name is not NUL-terminated".to_string()).into(),
            );
        }
        let name = PathBuf::from(
            std::str::from_utf8(&name_bytes)
                .map_err(|_| OrfError::CorruptIndex("entry name is not valid UTF-8".to_string()))?,
        );

        let consumed = ENTRY_FIXED_SIZE + name_length + 1;
        let padding = (ENTRY_BLOCK - consumed % ENTRY_BLOCK) % ENTRY_BLOCK;
        let mut pad = vec![0u8; padding];
        reader.read_exact(&mut pad)?;
        if pad.iter().any(|&byte| byte != 0) {
            return Err(OrfError::CorruptIndex("non-zero entry padding".to_string()).into());
        }

        Ok(IndexEntry {
            name,
            id,
            metadata: EntryMetadata {
                ctime,
                ctime_nsec,
                mtime,
                mtime_nsec,
                dev,
                ino,
                mode,
                uid,
                gid,
                size,
            },
            assume_valid: flags.contains(EntryFlags::ASSUME_VALID),
            stage,
        })
    }
}
