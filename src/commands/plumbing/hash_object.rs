use crate::areas::database::Database;
use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use bytes::Bytes;
use std::io::Write;

/// Interpret raw file content as the payload of the given object type
fn parse_payload(format: &str, data: Bytes) -> anyhow::Result<ObjectBox> {
    Ok(match ObjectType::try_parse(format)? {
        ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(data)?)),
        ObjectType::Tree => ObjectBox::Tree(Box::new(Tree::deserialize(data)?)),
        ObjectType::Commit => ObjectBox::Commit(Box::new(Commit::deserialize(data)?)),
        ObjectType::Tag => ObjectBox::Tag(Box::new(Tag::deserialize(data)?)),
    })
}

fn digest_of(database: Option<&Database>, object: &ObjectBox) -> anyhow::Result<ObjectId> {
    match (database, object) {
        (Some(db), ObjectBox::Blob(blob)) => db.store(blob.as_ref()),
        (Some(db), ObjectBox::Tree(tree)) => db.store(tree.as_ref()),
        (Some(db), ObjectBox::Commit(commit)) => db.store(commit.as_ref()),
        (Some(db), ObjectBox::Tag(tag)) => db.store(tag.as_ref()),
        (None, ObjectBox::Blob(blob)) => blob.object_id(),
        (None, ObjectBox::Tree(tree)) => tree.object_id(),
        (None, ObjectBox::Commit(commit)) => commit.object_id(),
        (None, ObjectBox::Tag(tag)) => tag.object_id(),
    }
}

/// Hash a file without a repository: the content-addressed "dry hash"
pub fn hash_only(path: &str, format: &str, writer: &mut dyn Write) -> anyhow::Result<()> {
    let data = std::fs::read(path)
        .map_err(|err| anyhow::anyhow!("error reading file {path}: {err}"))?;
    let object = parse_payload(format, Bytes::from(data))?;
    let oid = digest_of(None, &object)?;

    writeln!(writer, "{oid}")?;
    Ok(())
}

impl Repository {
    /// Hash a file's content, storing the object when `write` is set
    pub fn hash_object(&self, path: &str, format: &str, write: bool) -> anyhow::Result<()> {
        let data = std::fs::read(path)
            .map_err(|err| anyhow::anyhow!("error reading file {path}: {err}"))?;
        let object = parse_payload(format, Bytes::from(data))?;
        let oid = digest_of(write.then_some(self.database()), &object)?;

        writeln!(self.writer(), "{oid}")?;
        Ok(())
    }
}
