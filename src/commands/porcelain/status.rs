use crate::areas::repository::Repository;
use crate::artifacts::status::{self, FileChange};
use std::io::Write;

impl Repository {
    /// Print the staged and unstaged change lists
    pub fn status(&self) -> anyhow::Result<()> {
        let report = status::status(self)?;
        let mut writer = self.writer();

        if let Some(branch) = &report.branch {
            writeln!(writer, "On branch {branch}")?;
        }

        writeln!(writer, "Changes to be committed:")?;
        for (change, path) in &report.staged {
            let label = match change {
                FileChange::New => "new file",
                FileChange::Modified => "modified",
                FileChange::Deleted => "deleted",
            };
            writeln!(writer, "  ({label}) {path}")?;
        }

        writeln!(writer, "Changes not staged for commit:")?;
        for (change, path) in &report.unstaged {
            let label = match change {
                FileChange::Modified => "modified",
                FileChange::Deleted => "deleted",
                FileChange::New => "new file",
            };
            writeln!(writer, "  {label}: {path}")?;
        }

        Ok(())
    }
}
