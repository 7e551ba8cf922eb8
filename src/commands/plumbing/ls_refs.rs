use crate::areas::repository::Repository;

impl Repository {
    /// Print every reference with its resolved digest
    pub fn ls_refs(&self) -> anyhow::Result<()> {
        let refs = self.refs().list()?;
        let mut writer = self.writer();

        self.refs().show(writer.as_mut(), &refs, true, "refs")
    }
}
