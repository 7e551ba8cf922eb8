use crate::areas::repository::Repository;
use crate::artifacts::core::Value;
use crate::artifacts::identity::Author;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::revision;

impl Repository {
    /// Create a tag, or list existing tags when no name is given
    ///
    /// A lightweight tag is a plain ref; `-a` writes an annotated tag
    /// object and points the ref at it.
    pub fn tag(
        &self,
        name: Option<&str>,
        target: Option<&str>,
        annotated: bool,
    ) -> anyhow::Result<()> {
        let Some(name) = name else {
            return self.list_tags();
        };

        let target = target.unwrap_or("HEAD");
        let oid = revision::resolve(self, target, Some(ObjectType::Commit), true)?;

        if annotated {
            let author = Author::load()?;
            let tag = Tag::build(
                &oid,
                ObjectType::Commit,
                name,
                &author.display(),
                &format!("Tagging commit {oid}"),
            );
            let tag_oid = self.database().store(&tag)?;
            self.refs().create(&format!("tags/{name}"), &tag_oid)?;
        } else {
            self.refs().create(&format!("tags/{name}"), &oid)?;
        }

        Ok(())
    }

    fn list_tags(&self) -> anyhow::Result<()> {
        let refs = self.refs().list()?;

        if let Some(Value::Nested(tags)) = refs.get("tags") {
            let mut writer = self.writer();
            self.refs().show(writer.as_mut(), tags, true, "tags")?;
        }

        Ok(())
    }
}
