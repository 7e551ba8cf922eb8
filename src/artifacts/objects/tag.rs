//! Annotated tag object
//!
//! Same key/value payload shape as a commit; semantically a named pointer:
//! `object`, `type`, `tag`, `tagger`, then the message.

use crate::artifacts::core::{OrderedMap, Value, MESSAGE_KEY};
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    fields: OrderedMap,
}

impl Tag {
    pub fn build(
        target: &ObjectId,
        target_type: ObjectType,
        name: &str,
        tagger: &str,
        message: &str,
    ) -> Self {
        let mut fields = OrderedMap::new();
        fields.push_text("object", target.as_ref());
        fields.push_text("type", target_type.as_str());
        fields.push_text("tag", name);
        fields.push_text("tagger", tagger);

        let mut message = message.to_string();
        if !message.ends_with('\n') {
            message.push('\n');
        }
        fields.add(MESSAGE_KEY, Value::Text(message));

        Tag { fields }
    }

    pub fn fields(&self) -> &OrderedMap {
        &self.fields
    }

    /// The digest this tag points at
    pub fn target(&self) -> anyhow::Result<ObjectId> {
        let target = self
            .fields
            .get_text("object")
            .context("tag has no object field")?;
        ObjectId::try_parse(target.to_string())
    }
}

impl Packable for Tag {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(Bytes::from(self.fields.serialize()))
    }
}

impl Unpackable for Tag {
    fn deserialize(payload: Bytes) -> anyhow::Result<Self> {
        let fields = OrderedMap::parse(&payload).context("malformed tag payload")?;
        Ok(Tag { fields })
    }
}

impl Object for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.fields.serialize()).into_owned()
    }
}
