use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Print the staged paths; `-v` adds the cached stat fields
    pub fn ls_files(&self, verbose: bool) -> anyhow::Result<()> {
        let index = self.load_index()?;

        for entry in index.entries() {
            writeln!(self.writer(), "{}", entry.name.display())?;

            if verbose {
                let metadata = &entry.metadata;
                let mut writer = self.writer();
                writeln!(writer, "  mode_type: {:b}", metadata.mode.kind.nibble())?;
                writeln!(writer, "  mode: {:o}", metadata.mode.perms)?;
                writeln!(writer, "  size: {}", metadata.size)?;
                writeln!(writer, "  sha(blob): {}", entry.id)?;
                writeln!(writer, "  ctime: {}.{}", metadata.ctime, metadata.ctime_nsec)?;
                writeln!(writer, "  mtime: {}.{}", metadata.mtime, metadata.mtime_nsec)?;
                writeln!(writer, "  device: {}", metadata.dev)?;
                writeln!(writer, "  inode: {}", metadata.ino)?;
                writeln!(writer, "  uid: {}", metadata.uid)?;
                writeln!(writer, "  gid: {}", metadata.gid)?;
                writeln!(writer, "  flags_valid: {}", entry.assume_valid)?;
                writeln!(writer, "  flag_staged: {}", entry.stage)?;
            }
        }

        Ok(())
    }
}
