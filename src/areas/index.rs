//! Staging area
//!
//! In-memory view of the binary index file. Entries are kept sorted by
//! path; every mutation rewrites the file whole. Loading takes a shared
//! lock, writing an exclusive one.

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use anyhow::Context;
use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Index {
    /// Path to the index file (`.orf/index`)
    path: Box<Path>,
    /// Staged entries ordered by path
    entries: BTreeMap<PathBuf, IndexEntry>,
    /// Set when the in-memory state diverges from disk
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the index from disk; a missing file is an empty index
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .with_context(|| format!("failed to open index file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut file, file_guard::Lock::Shared, 0, 1)?;

        if lock.metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = BufReader::new(&mut *lock);
        let header = IndexHeader::deserialize(&mut reader)?;

        for _ in 0..header.entries_count {
            let entry = IndexEntry::deserialize(&mut reader)?;
            self.entries.insert(entry.name.clone(), entry);
        }

        Ok(())
    }

    /// Insert or replace an entry
    pub fn add(&mut self, entry: IndexEntry) {
        self.entries.insert(entry.name.clone(), entry);
        self.changed = true;
    }

    /// Drop an entry, reporting whether it was present
    pub fn remove(&mut self, path: &Path) -> bool {
        let removed = self.entries.remove(path).is_some();
        if removed {
            self.changed = true;
        }
        removed
    }

    /// Rewrite the index file from the in-memory entries
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("failed to open index file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = BufWriter::new(&mut *lock);

        let header = IndexHeader::new(self.entries.len() as u32);
        writer.write_all(&header.serialize()?)?;

        for entry in self.entries.values() {
            writer.write_all(&entry.serialize()?)?;
        }

        writer.flush()?;
        self.changed = false;

        Ok(())
    }
}
