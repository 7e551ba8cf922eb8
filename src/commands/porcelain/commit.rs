use crate::areas::repository::Repository;
use crate::artifacts::identity::Author;
use crate::artifacts::snapshot;
use std::io::Write;

impl Repository {
    /// Snapshot the index into a commit and advance the current ref
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let index = self.load_index()?;

        let tree_oid = snapshot::write_tree(self.database(), index.entries())?;
        let parent = self.refs().read_head()?;
        let author = Author::load()?;

        let commit_oid = snapshot::write_commit(
            self.database(),
            &tree_oid,
            parent.as_ref(),
            &author,
            message,
        )?;
        drop(index);

        self.refs().update_current(&commit_oid)?;

        let branch = self
            .refs()
            .current_branch()?
            .unwrap_or_else(|| "detached HEAD".to_string());
        let first_line = message.lines().next().unwrap_or("");
        writeln!(
            self.writer(),
            "[{branch} {}] {first_line}",
            commit_oid.abbrev()
        )?;

        Ok(())
    }
}
