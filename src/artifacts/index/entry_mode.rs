//! Index entry mode word
//!
//! The on-disk mode is a u32 whose low 16 bits carry a type nibble
//! (bits 12-15) and nine permission bits. Only three types are legal in an
//! index entry: regular file, symlink and gitlink.

use crate::error::OrfError;
use is_executable::IsExecutable;
use std::fs::Metadata;
use std::path::Path;

/// Permission bits mask (low nine bits)
const PERMS_MASK: u32 = 0o777;

/// Type nibble of an index entry's mode word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeKind {
    #[default]
    Regular,
    Symlink,
    Gitlink,
}

impl ModeKind {
    pub fn nibble(&self) -> u8 {
        match self {
            ModeKind::Regular => 0b1000,
            ModeKind::Symlink => 0b1010,
            ModeKind::Gitlink => 0b1110,
        }
    }

    fn try_from_nibble(nibble: u8) -> anyhow::Result<Self> {
        match nibble {
            0b1000 => Ok(ModeKind::Regular),
            0b1010 => Ok(ModeKind::Symlink),
            0b1110 => Ok(ModeKind::Gitlink),
            other => {
                Err(OrfError::CorruptIndex(format!("invalid mode type nibble {other:#b}")).into())
            }
        }
    }
}

/// Decoded mode word of an index entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryMode {
    pub kind: ModeKind,
    pub perms: u16,
}

impl EntryMode {
    pub const REGULAR: EntryMode = EntryMode {
        kind: ModeKind::Regular,
        perms: 0o644,
    };

    pub const EXECUTABLE: EntryMode = EntryMode {
        kind: ModeKind::Regular,
        perms: 0o755,
    };

    pub fn as_word(&self) -> u32 {
        ((self.kind.nibble() as u32) << 12) | (self.perms as u32 & PERMS_MASK)
    }

    pub fn try_from_word(word: u32) -> anyhow::Result<Self> {
        let kind = ModeKind::try_from_nibble(((word >> 12) & 0xF) as u8)?;
        Ok(EntryMode {
            kind,
            perms: (word & PERMS_MASK) as u16,
        })
    }

    /// Derive the mode from a live file
    pub fn from_file(path: &Path, metadata: &Metadata) -> Self {
        if metadata.file_type().is_symlink() {
            EntryMode {
                kind: ModeKind::Symlink,
                perms: 0,
            }
        } else if path.is_executable() {
            EntryMode::EXECUTABLE
        } else {
            EntryMode::REGULAR
        }
    }
}
