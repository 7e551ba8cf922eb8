use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::revision;
use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};

impl Repository {
    /// Print the leaves of a tree, descending into subtrees with `-r`
    pub fn ls_tree(&self, name: &str, recursive: bool) -> anyhow::Result<()> {
        let oid = revision::resolve(self, name, Some(ObjectType::Tree), true)?;
        let tree = self
            .database()
            .parse_object_as_tree(&oid)?
            .with_context(|| format!("object {} is not a tree", oid.abbrev()))?;

        self.print_tree(&tree, recursive, Path::new(""))
    }

    fn print_tree(&self, tree: &Tree, recursive: bool, prefix: &Path) -> anyhow::Result<()> {
        for leaf in tree.leaves() {
            let path: PathBuf = prefix.join(&leaf.name);

            if recursive && leaf.mode.is_subtree() {
                let oid = self.database().resolve_short(&leaf.id)?;
                let subtree = self
                    .database()
                    .parse_object_as_tree(&oid)?
                    .with_context(|| format!("leaf {} is not a tree", leaf.id))?;
                self.print_tree(&subtree, recursive, &path)?;
            } else {
                writeln!(
                    self.writer(),
                    "{} {} {}\t{}",
                    leaf.mode.as_str(),
                    leaf.mode.object_kind(),
                    leaf.id,
                    path.display()
                )?;
            }
        }

        Ok(())
    }
}
