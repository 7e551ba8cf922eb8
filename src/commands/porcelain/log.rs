use crate::areas::repository::Repository;
use crate::artifacts::log;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision;

impl Repository {
    /// Emit the ancestry of a commit as a DOT digraph
    pub fn log(&self, name: &str) -> anyhow::Result<()> {
        let oid = revision::resolve(self, name, Some(ObjectType::Commit), true)?;
        let mut writer = self.writer();

        log::render_graph(self, writer.as_mut(), &oid)
    }
}
