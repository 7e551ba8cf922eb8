//! Command implementations
//!
//! Organized into two layers following the usual split:
//!
//! - `plumbing`: object-level commands (cat, hash, ls-tree, ls-files,
//!   ls-refs, rev-parse)
//! - `porcelain`: workflow commands (add, rm, commit, status, checkout,
//!   log, tag)
//!
//! Each file extends `Repository` with one command; output goes through
//! the repository's writer.

pub mod plumbing;
pub mod porcelain;
