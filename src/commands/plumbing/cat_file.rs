use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision;
use std::io::Write;

impl Repository {
    /// Resolve a name to an object of the wanted type and print its payload
    pub fn cat(&self, object_type: &str, name: &str) -> anyhow::Result<()> {
        let want = ObjectType::try_parse(object_type)?;
        let oid = revision::resolve(self, name, Some(want), true)?;
        let object = self.database().read(&oid)?;

        writeln!(self.writer(), "{}", object.display())?;
        Ok(())
    }
}
