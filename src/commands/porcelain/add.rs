use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use std::path::Path;

impl Repository {
    /// Stage files: hash their content into the store and record an entry
    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.load_index()?;

        // Normalise everything first so a bad path leaves the index file alone
        let mut rel_paths = Vec::with_capacity(paths.len());
        for path in paths {
            let rel = self.workspace().relativize(Path::new(path))?;
            if !self.workspace().file_exists(&rel) {
                anyhow::bail!("not a file: {path}");
            }
            rel_paths.push(rel);
        }

        for rel in rel_paths {
            let data = self.workspace().read_file(&rel)?;
            let blob = Blob::new(data);
            let oid = self.database().store(&blob)?;
            let metadata = self.workspace().stat_file(&rel)?;

            index.add(IndexEntry::new(rel, oid.to_short(), metadata));
        }

        index.write_updates()
    }
}
