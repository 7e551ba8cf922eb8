//! Commit object
//!
//! A commit names a tree, zero or more parents, authorship and a message.
//! The payload is an ordered key/value block:
//!
//! ```text
//! tree <tree-digest>
//! parent <parent-digest>
//! author <name> <email> <unix-seconds> <±HHMM>
//! committer <name> <email> <unix-seconds> <±HHMM>
//!
//! <message>
//! ```

use crate::artifacts::core::{OrderedMap, Value, MESSAGE_KEY};
use crate::artifacts::identity::Author;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    fields: OrderedMap,
}

impl Commit {
    /// Assemble a commit block in canonical key order
    pub fn build(
        tree_oid: &ObjectId,
        parent: Option<&ObjectId>,
        author: &Author,
        message: &str,
    ) -> Self {
        let mut fields = OrderedMap::new();
        fields.push_text("tree", tree_oid.as_ref());
        if let Some(parent) = parent {
            fields.push_text("parent", parent.as_ref());
        }
        fields.push_text("author", author.display());
        fields.push_text("committer", author.display());

        let mut message = message.to_string();
        if !message.ends_with('\n') {
            message.push('\n');
        }
        fields.add(MESSAGE_KEY, Value::Text(message));

        Commit { fields }
    }

    pub fn fields(&self) -> &OrderedMap {
        &self.fields
    }

    pub fn tree_oid(&self) -> anyhow::Result<ObjectId> {
        let tree = self
            .fields
            .get_text("tree")
            .context("commit has no tree field")?;
        ObjectId::try_parse(tree.to_string())
    }

    pub fn parents(&self) -> anyhow::Result<Vec<ObjectId>> {
        self.fields
            .get_all("parent")
            .into_iter()
            .map(|parent| ObjectId::try_parse(parent.to_string()))
            .collect()
    }

    pub fn message(&self) -> &str {
        self.fields.get_text(MESSAGE_KEY).unwrap_or("")
    }

    /// First line of the message, for graph labels
    pub fn short_message(&self) -> &str {
        self.message().lines().next().unwrap_or("")
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(Bytes::from(self.fields.serialize()))
    }
}

impl Unpackable for Commit {
    fn deserialize(payload: Bytes) -> anyhow::Result<Self> {
        let fields = OrderedMap::parse(&payload).context("malformed commit payload")?;
        Ok(Commit { fields })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.fields.serialize()).into_owned()
    }
}
