//! Tree materialisation
//!
//! Writes a stored tree (or a commit's tree) onto the filesystem. The
//! destination must be an empty directory or a path that does not exist
//! yet; subtrees become directories, blobs become files.

use crate::areas::database::Database;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::error::OrfError;
use anyhow::Context;
use std::path::Path;

/// Materialise a commit or tree object into `dest`
pub fn checkout(database: &Database, oid: &ObjectId, dest: &Path) -> anyhow::Result<()> {
    let tree = match database.read(oid)? {
        ObjectBox::Tree(tree) => *tree,
        ObjectBox::Commit(commit) => {
            let tree_oid = commit.tree_oid()?;
            database
                .parse_object_as_tree(&tree_oid)?
                .with_context(|| format!("commit {} names a non-tree {}", oid.abbrev(), tree_oid))?
        }
        other => anyhow::bail!(
            "cannot check out a {}: {}",
            other.object_type(),
            oid.abbrev()
        ),
    };

    prepare_directory(dest)?;
    materialise(database, &tree, dest)
}

/// Ensure the destination exists and is an empty directory
fn prepare_directory(dest: &Path) -> anyhow::Result<()> {
    if !dest.exists() {
        std::fs::create_dir_all(dest)
            .with_context(|| format!("failed to create directory {}", dest.display()))?;
        return Ok(());
    }

    if !dest.is_dir() {
        anyhow::bail!("not a directory: {}", dest.display());
    }
    if dest.read_dir()?.next().is_some() {
        return Err(OrfError::DestinationNotEmpty(dest.to_path_buf()).into());
    }

    Ok(())
}

fn materialise(database: &Database, tree: &Tree, dest: &Path) -> anyhow::Result<()> {
    for leaf in tree.leaves() {
        let target = dest.join(&leaf.name);

        match database.read_short(&leaf.id)? {
            ObjectBox::Tree(subtree) => {
                std::fs::create_dir(&target)
                    .with_context(|| format!("failed to create directory {}", target.display()))?;
                materialise(database, &subtree, &target)?;
            }
            ObjectBox::Blob(blob) => {
                std::fs::write(&target, blob.data())
                    .with_context(|| format!("failed to write file {}", target.display()))?;
            }
            other => anyhow::bail!(
                "unexpected {} inside tree at {}",
                other.object_type(),
                target.display()
            ),
        }
    }

    Ok(())
}
