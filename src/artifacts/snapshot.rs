//! Index → tree graph
//!
//! Derives the tree-of-trees for a commit from the flat index path list.
//! Entries group by parent directory; every interior directory gets a
//! (possibly empty) group of its own. Directories are processed deepest
//! first, ordered by separator count rather than raw string length so that
//! `a/bb` and `aa/b` land at the same depth, and each finished subtree
//! contributes a leaf to its parent. The final, root write yields the
//! digest the commit records as its `tree`.

use crate::areas::database::Database;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::identity::Author;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Leaf, LeafMode, Tree};
use anyhow::Context;
use std::collections::BTreeMap;

/// Write the nested trees for a set of index entries, returning the root digest
pub fn write_tree<'a>(
    database: &Database,
    entries: impl Iterator<Item = &'a IndexEntry>,
) -> anyhow::Result<ObjectId> {
    let mut contents: BTreeMap<String, Vec<Leaf>> = BTreeMap::new();
    contents.insert(String::new(), Vec::new());

    for entry in entries {
        let name = entry
            .name
            .to_str()
            .with_context(|| format!("entry name is not valid UTF-8: {:?}", entry.name))?;
        let dirname = parent_dir(name);

        // Every directory on the path needs a group, including interior
        // directories with no direct children.
        let mut ancestor = dirname.to_string();
        while !ancestor.is_empty() {
            contents.entry(ancestor.clone()).or_default();
            ancestor = parent_dir(&ancestor).to_string();
        }

        let mode = LeafMode::from_mode_word(
            entry.metadata.mode.kind.nibble(),
            entry.metadata.mode.perms,
        )?;
        contents.entry(dirname.to_string()).or_default().push(Leaf::new(
            mode,
            basename(name).to_string(),
            entry.id.clone(),
        ));
    }

    // Deepest directories first: children must be written before their
    // parent can reference them.
    let mut directories: Vec<String> = contents.keys().cloned().collect();
    directories.sort_by(|a, b| {
        separator_count(b)
            .cmp(&separator_count(a))
            .then_with(|| b.cmp(a))
    });

    let mut root_oid = None;
    for directory in directories {
        let leaves = contents.remove(&directory).unwrap_or_default();
        let tree = Tree::new(leaves);
        let oid = database.store(&tree)?;

        if directory.is_empty() {
            root_oid = Some(oid);
        } else {
            let parent = parent_dir(&directory).to_string();
            contents
                .entry(parent)
                .or_default()
                .push(Leaf::new(
                    LeafMode::Subtree,
                    basename(&directory).to_string(),
                    oid.to_short(),
                ));
        }
    }

    root_oid.context("tree build produced no root")
}

/// Write a commit for a tree and advance nothing; ref updates are the caller's
pub fn write_commit(
    database: &Database,
    tree_oid: &ObjectId,
    parent: Option<&ObjectId>,
    author: &Author,
    message: &str,
) -> anyhow::Result<ObjectId> {
    let commit = Commit::build(tree_oid, parent, author, message);
    database.store(&commit)
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn basename(path: &str) -> &str {
    path.rsplit_once('/').map(|(_, base)| base).unwrap_or(path)
}

fn separator_count(path: &str) -> usize {
    path.matches('/').count()
}
