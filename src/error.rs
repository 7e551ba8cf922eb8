//! Error kinds surfaced by repository operations
//!
//! Operations propagate `anyhow::Error` chains with context added at each
//! layer; the kinds below sit at the root of a chain so callers and tests
//! can match on them via `downcast_ref`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum OrfError {
    #[error("not an orf repository (or any of the parent directories): {0}")]
    NotARepository(PathBuf),

    #[error("repository already exists at {0}")]
    RepoExists(PathBuf),

    #[error("unsupported repositoryformatversion: {0}")]
    UnsupportedFormat(u32),

    #[error("invalid object frame: {0}")]
    InvalidFrame(String),

    #[error("object size mismatch: header declares {declared}, payload has {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("unknown object type: {0}")]
    UnknownType(String),

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    #[error("no candidates found for name: {0}")]
    NotFound(String),

    #[error("ambiguous name {name}: candidates are {candidates:?}")]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },

    #[error("path is outside the worktree: {0}")]
    OutsideWorktree(PathBuf),

    #[error("path is not in the index: {0}")]
    PathNotInIndex(PathBuf),

    #[error("checkout destination is not empty: {0}")]
    DestinationNotEmpty(PathBuf),

    #[error("reference chain contains a cycle at {0}")]
    RefCycle(String),
}
