use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision;
use std::io::Write;

impl Repository {
    /// Print the canonical digest a name resolves to
    ///
    /// `--type` dereferences through tags (and commits, for trees) until
    /// an object of the wanted type is reached.
    pub fn rev_parse(&self, name: &str, object_type: Option<&str>) -> anyhow::Result<()> {
        let want = object_type.map(ObjectType::try_parse).transpose()?;
        let oid = revision::resolve(self, name, want, true)?;

        writeln!(self.writer(), "{oid}")?;
        Ok(())
    }
}
