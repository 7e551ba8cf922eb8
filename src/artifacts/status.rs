//! Working-tree diff
//!
//! Two passes over the index produce the status report: the staged pass
//! compares the index against a flattening of the `HEAD` tree, the
//! unstaged pass compares it against live files, trusting the stat cache
//! and re-hashing content only when the timestamps moved. Untracked files
//! are intentionally left unclassified.

use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::{ObjectId, ShortId};
use crate::artifacts::objects::tree::Tree;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    New,
    Modified,
    Deleted,
}

#[derive(Debug, Default)]
pub struct StatusReport {
    /// Current branch, `None` when HEAD is detached
    pub branch: Option<String>,
    /// Index vs the `HEAD` tree
    pub staged: Vec<(FileChange, String)>,
    /// Index vs live files
    pub unstaged: Vec<(FileChange, String)>,
}

pub fn status(repository: &Repository) -> anyhow::Result<StatusReport> {
    let index = repository.load_index()?;

    let mut report = StatusReport {
        branch: repository.refs().current_branch()?,
        ..Default::default()
    };

    // Staged pass
    let mut head_files = BTreeMap::new();
    if let Some(head_oid) = repository.refs().read_head()? {
        if let Some(commit) = repository.database().parse_object_as_commit(&head_oid)? {
            let tree_oid = commit.tree_oid()?;
            if let Some(tree) = repository.database().parse_object_as_tree(&tree_oid)? {
                flatten_tree(repository, &tree, "", &mut head_files)?;
            }
        }
    }

    for entry in index.entries() {
        let name = entry.name.to_string_lossy().into_owned();

        match head_files.remove(&name) {
            None => report.staged.push((FileChange::New, name)),
            Some(head_id) if head_id != entry.id => {
                report.staged.push((FileChange::Modified, name));
            }
            Some(_) => {}
        }
    }
    for (name, _) in head_files {
        report.staged.push((FileChange::Deleted, name));
    }

    // Unstaged pass: one walk of the worktree, then stat comparisons
    let live_files: HashSet<PathBuf> = repository
        .workspace()
        .list_files()?
        .into_iter()
        .collect();

    for entry in index.entries() {
        let name = entry.name.to_string_lossy().into_owned();

        if !live_files.contains(&entry.name) {
            report.unstaged.push((FileChange::Deleted, name));
            continue;
        }

        let live = repository.workspace().stat_file(&entry.name)?;
        if live.timestamps() == entry.metadata.timestamps() {
            continue;
        }

        // Timestamps moved; only a content hash can tell change from touch
        let live_id = hash_worktree_file(repository, &entry.name)?;
        if live_id != entry.id {
            report.unstaged.push((FileChange::Modified, name));
        }
    }

    Ok(report)
}

/// Flatten a stored tree into path → digest pairs
fn flatten_tree(
    repository: &Repository,
    tree: &Tree,
    prefix: &str,
    output: &mut BTreeMap<String, ShortId>,
) -> anyhow::Result<()> {
    for leaf in tree.leaves() {
        let path = if prefix.is_empty() {
            leaf.name.clone()
        } else {
            format!("{prefix}/{}", leaf.name)
        };

        if leaf.mode.is_subtree() {
            let oid = repository.database().resolve_short(&leaf.id)?;
            if let Some(subtree) = repository.database().parse_object_as_tree(&oid)? {
                flatten_tree(repository, &subtree, &path, output)?;
            }
        } else {
            output.insert(path, leaf.id.clone());
        }
    }

    Ok(())
}

fn hash_worktree_file(repository: &Repository, rel_path: &Path) -> anyhow::Result<ShortId> {
    let data = repository.workspace().read_file(rel_path)?;
    let blob = Blob::new(data);
    let oid: ObjectId = repository.database().hash(&blob)?;

    Ok(oid.to_short())
}
