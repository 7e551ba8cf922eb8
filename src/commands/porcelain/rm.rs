use crate::areas::repository::Repository;
use crate::error::OrfError;
use std::path::Path;

impl Repository {
    /// Unstage paths, removing the worktree files as well when `delete`
    pub fn rm(&self, paths: &[String], delete: bool, skip_missing: bool) -> anyhow::Result<()> {
        let mut index = self.load_index()?;

        let mut rel_paths = Vec::with_capacity(paths.len());
        for path in paths {
            let rel = self.workspace().relativize(Path::new(path))?;

            if index.entry_by_path(&rel).is_none() {
                if skip_missing {
                    continue;
                }
                return Err(OrfError::PathNotInIndex(rel).into());
            }
            rel_paths.push(rel);
        }

        // All paths vetted; now mutate
        for rel in rel_paths {
            index.remove(&rel);
            if delete && self.workspace().file_exists(&rel) {
                self.workspace().remove_file(&rel)?;
            }
        }

        index.write_updates()
    }
}
