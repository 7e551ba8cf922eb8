//! Index file format
//!
//! The staging area is a single binary file:
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC"
//!   - Version: 2
//!   - Entry count
//!
//! Entries (variable length):
//!   - 62-byte stat block, digest and flags
//!   - NUL-terminated path, padded to 8-byte alignment
//! ```
//!
//! There is no checksum trailer; an empty index is the header alone.

pub mod entry_mode;
pub mod index_entry;
pub mod index_header;

/// Magic signature identifying index files
pub const SIGNATURE: &str = "DIRC";

/// Index file format version
pub const VERSION: u32 = 2;

/// Size of the index header in bytes
pub const HEADER_SIZE: usize = 12;
