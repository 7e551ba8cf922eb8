//! Insertion-ordered key/value map
//!
//! Commit and tag payloads are a block of `key value` lines followed by a
//! blank line and a free-form message. Keys may repeat (`parent` in a merge
//! commit) and values may span lines, each continuation line starting with a
//! single space. Reference listings reuse the same map with nested values
//! for subdirectories.

use anyhow::Context;
use std::collections::HashMap;

/// Key reserved for the free-form body after the blank line
pub const MESSAGE_KEY: &str = "message";

/// Value held under a key
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Value {
    /// A single line of text
    Text(String),
    /// Repeated occurrences of the same key, in insertion order
    Many(Vec<String>),
    /// A nested map (directory of references)
    Nested(Box<OrderedMap>),
}

/// Map that remembers the order keys were first inserted in
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct OrderedMap {
    data: HashMap<String, Value>,
    order: Vec<String>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// First textual value under a key, if any
    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.data.get(key)? {
            Value::Text(text) => Some(text),
            Value::Many(values) => values.first().map(String::as_str),
            Value::Nested(_) => None,
        }
    }

    /// All textual values under a key, in insertion order
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        match self.data.get(key) {
            Some(Value::Text(text)) => vec![text.as_str()],
            Some(Value::Many(values)) => values.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insert a value, recording key order on first insertion
    pub fn add(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if !self.data.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.data.insert(key, value);
    }

    /// Insert a line of text, accumulating repeats into a `Many`
    pub fn push_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let key = key.into();
        let text = text.into();

        match self.data.get_mut(&key) {
            None => {
                self.order.push(key.clone());
                self.data.insert(key, Value::Text(text));
            }
            Some(Value::Text(existing)) => {
                let first = std::mem::take(existing);
                self.data.insert(key, Value::Many(vec![first, text]));
            }
            Some(Value::Many(values)) => values.push(text),
            Some(Value::Nested(_)) => {
                self.data.insert(key, Value::Text(text));
            }
        }
    }

    /// Parse a commit/tag header block
    ///
    /// `key SP value NL` lines, continuation lines prefixed with one space,
    /// a blank line terminating the block; everything after it is stored
    /// under [`MESSAGE_KEY`].
    pub fn parse(payload: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(payload).context("header block is not valid UTF-8")?;
        let mut map = OrderedMap::new();
        let mut rest = text;

        loop {
            if rest.is_empty() {
                return Ok(map);
            }

            if let Some(message) = rest.strip_prefix('\n') {
                map.add(MESSAGE_KEY, Value::Text(message.to_string()));
                return Ok(map);
            }

            let line_end = rest.find('\n').unwrap_or(rest.len());
            let line = &rest[..line_end];
            rest = &rest[(line_end + 1).min(rest.len())..];

            let space = line
                .find(' ')
                .with_context(|| format!("malformed header line: {line:?}"))?;
            let key = &line[..space];
            let mut value = line[space + 1..].to_string();

            // Fold continuation lines back into the value
            while let Some(continued) = rest.strip_prefix(' ') {
                let line_end = continued.find('\n').unwrap_or(continued.len());
                value.push('\n');
                value.push_str(&continued[..line_end]);
                rest = &continued[(line_end + 1).min(continued.len())..];
            }

            map.push_text(key, value);
        }
    }

    /// Serialize back to the header-block form parsed by [`OrderedMap::parse`]
    pub fn serialize(&self) -> Vec<u8> {
        let mut output = Vec::new();

        for key in &self.order {
            if key == MESSAGE_KEY {
                continue;
            }

            for value in self.get_all(key) {
                let folded = value.replace('\n', "\n ");
                output.extend_from_slice(key.as_bytes());
                output.push(b' ');
                output.extend_from_slice(folded.as_bytes());
                output.push(b'\n');
            }
        }

        if let Some(Value::Text(message)) = self.data.get(MESSAGE_KEY) {
            output.push(b'\n');
            output.extend_from_slice(message.as_bytes());
        }

        output
    }
}
