//! Working tree access
//!
//! File listing, content reads and stat capture for the user's checked-out
//! tree. The repository directory itself is never part of the worktree.

use crate::artifacts::index::index_entry::EntryMetadata;
use crate::error::OrfError;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Repository directory name, skipped on every walk
pub const ORF_DIR: &str = ".orf";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All files under the worktree, paths relative to its root
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        Ok(WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ORF_DIR)
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .map(Path::to_path_buf)
                    .ok()
            })
            .collect())
    }

    pub fn read_file(&self, rel_path: &Path) -> anyhow::Result<Bytes> {
        let path = self.path.join(rel_path);
        let data = std::fs::read(&path)
            .with_context(|| format!("unable to read file {}", path.display()))?;

        Ok(Bytes::from(data))
    }

    pub fn file_exists(&self, rel_path: &Path) -> bool {
        self.path.join(rel_path).is_file()
    }

    pub fn stat_file(&self, rel_path: &Path) -> anyhow::Result<EntryMetadata> {
        let path = self.path.join(rel_path);
        // symlink_metadata so a staged symlink keeps its own mode
        let metadata = std::fs::symlink_metadata(&path)
            .with_context(|| format!("unable to stat file {}", path.display()))?;

        Ok(EntryMetadata::from((path.as_path(), &metadata)))
    }

    pub fn remove_file(&self, rel_path: &Path) -> anyhow::Result<()> {
        let path = self.path.join(rel_path);
        std::fs::remove_file(&path)
            .with_context(|| format!("unable to remove file {}", path.display()))
    }

    /// Normalise a user-supplied path to a worktree-relative one
    ///
    /// The path must resolve to a location inside the worktree.
    pub fn relativize(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        // Canonicalise the existing ancestor so symlinked tempdirs compare
        // equal to the canonicalised worktree root.
        let absolute = match absolute.canonicalize() {
            Ok(canonical) => canonical,
            Err(_) => absolute,
        };

        absolute
            .strip_prefix(self.path.as_ref())
            .map(Path::to_path_buf)
            .map_err(|_| OrfError::OutsideWorktree(path.to_path_buf()).into())
    }
}
