//! Reference store
//!
//! References are single-line text files under the repository directory: a
//! 64-hex digest, or `ref: <relative-path>` pointing at another reference.
//! `HEAD` is itself a reference; a symbolic target whose file does not
//! exist yet is an unborn branch, not an error.

use crate::artifacts::core::{OrderedMap, Value};
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::OrfError;
use anyhow::Context;
use derive_new::new;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Prefix marking a symbolic reference
const SYMREF_PREFIX: &str = "ref: ";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Prefix of branch references relative to the repository directory
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Prefix of tag references relative to the repository directory
pub const TAGS_PREFIX: &str = "refs/tags/";

#[derive(Debug, new)]
pub struct Refs {
    /// Repository directory (`.orf`)
    path: Box<Path>,
}

impl Refs {
    /// Resolve a reference name to a digest, following `ref: ` chains
    ///
    /// `Ok(None)` marks an unborn branch (a symbolic target with no file).
    /// A repeated name in the chain is a cycle and fails.
    pub fn resolve(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let mut visited = HashSet::new();
        self.resolve_chain(name, &mut visited)
    }

    fn resolve_chain(
        &self,
        name: &str,
        visited: &mut HashSet<String>,
    ) -> anyhow::Result<Option<ObjectId>> {
        if !visited.insert(name.to_string()) {
            return Err(OrfError::RefCycle(name.to_string()).into());
        }

        let path = self.path.join(name);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read ref file {}", path.display()))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        match content.strip_prefix(SYMREF_PREFIX) {
            Some(target) => self.resolve_chain(target.trim(), visited),
            None => Ok(Some(ObjectId::try_parse(content.to_string())?)),
        }
    }

    /// Create (or overwrite) `refs/<name>` pointing at a digest
    pub fn create(&self, name: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let ref_path = self.refs_path().join(name);
        self.write_ref_file(&ref_path, &format!("{oid}\n"))
    }

    /// Write an arbitrary reference file relative to the repository directory
    pub fn write_raw(&self, name: &str, content: &str) -> anyhow::Result<()> {
        let ref_path = self.path.join(name);
        self.write_ref_file(&ref_path, content)
    }

    fn write_ref_file(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .with_context(|| format!("invalid ref path {}", path.display()))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create ref directory {}", parent.display()))?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("failed to write ref file {}", path.display()))?;

        Ok(())
    }

    /// Digest HEAD currently resolves to, if any commit exists yet
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.resolve(HEAD_REF_NAME)
    }

    /// Branch name HEAD points at, or `None` when detached
    pub fn current_branch(&self) -> anyhow::Result<Option<String>> {
        let head_path = self.path.join(HEAD_REF_NAME);
        if !head_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read {}", head_path.display()))?;

        Ok(content
            .trim()
            .strip_prefix(SYMREF_PREFIX)
            .and_then(|target| target.trim().strip_prefix(HEADS_PREFIX))
            .map(ToString::to_string))
    }

    /// Advance the current branch (or a detached HEAD) to a new commit
    pub fn update_current(&self, oid: &ObjectId) -> anyhow::Result<()> {
        match self.current_branch()? {
            Some(branch) => self.write_raw(&format!("{HEADS_PREFIX}{branch}"), &format!("{oid}\n")),
            None => self.write_raw(HEAD_REF_NAME, &format!("{oid}\n")),
        }
    }

    /// Nested name → digest listing of everything under `refs/`
    ///
    /// Entries sort lexicographically; directories become nested maps.
    pub fn list(&self) -> anyhow::Result<OrderedMap> {
        self.list_dir(&self.refs_path(), "refs")
    }

    fn list_dir(&self, dir: &Path, rel_prefix: &str) -> anyhow::Result<OrderedMap> {
        let mut output = OrderedMap::new();

        if !dir.is_dir() {
            return Ok(output);
        }

        let mut entries: Vec<_> = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read refs directory {}", dir.display()))?
            .collect::<Result<_, _>>()?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            let child_rel = format!("{rel_prefix}/{name}");

            if entry.path().is_dir() {
                let nested = self.list_dir(&entry.path(), &child_rel)?;
                output.add(name, Value::Nested(Box::new(nested)));
            } else {
                let digest = self
                    .resolve(&child_rel)
                    .with_context(|| format!("error resolving ref {child_rel}"))?
                    .map(|oid| oid.to_string())
                    .unwrap_or_default();
                output.add(name, Value::Text(digest));
            }
        }

        Ok(output)
    }

    /// Pre-order emission of a listing, one leaf per line
    pub fn show(
        &self,
        writer: &mut dyn Write,
        refs: &OrderedMap,
        with_hash: bool,
        prefix: &str,
    ) -> anyhow::Result<()> {
        for key in refs.keys() {
            match refs.get(key) {
                Some(Value::Nested(nested)) => {
                    let child_prefix = if prefix.is_empty() {
                        key.to_string()
                    } else {
                        format!("{prefix}/{key}")
                    };
                    self.show(writer, nested, with_hash, &child_prefix)?;
                }
                Some(Value::Text(digest)) => {
                    if with_hash {
                        writeln!(writer, "{digest} {prefix}/{key}")?;
                    } else {
                        writeln!(writer, "{prefix}/{key}")?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn refs_path(&self) -> std::path::PathBuf {
        self.path.join("refs")
    }
}
