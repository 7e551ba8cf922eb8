use crate::areas::repository::Repository;
use crate::artifacts::checkout;
use crate::artifacts::revision;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Materialise a commit or tree into an empty directory
    pub fn checkout(&self, name: &str, dest: &str) -> anyhow::Result<()> {
        let oid = revision::resolve(self, name, None, false)?;
        checkout::checkout(self.database(), &oid, Path::new(dest))?;

        writeln!(self.writer(), "Checked out {} into {dest}", oid.abbrev())?;
        Ok(())
    }
}
