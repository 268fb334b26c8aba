//! Frontmatter values and candidate notes.
//!
//! # Invariants
//! - Only integer numbers are kept; fractional numbers, nulls and nested
//!   objects are dropped at the JSON boundary.
//! - Key lookup is exact (case-sensitive).

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(i64),
    String(String),
    List(Vec<MetadataValue>),
}

impl MetadataValue {
    /// Converts a JSON value, returning `None` for unsupported shapes.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(Self::Bool(*flag)),
            Value::Number(number) => match number.as_i64() {
                Some(number) => Some(Self::Number(number)),
                None => {
                    debug!(
                        "event=metadata_value module=model status=dropped reason=not_an_integer value={number}"
                    );
                    None
                }
            },
            Value::String(text) => Some(Self::String(text.clone())),
            Value::Array(items) => Some(Self::List(
                items.iter().filter_map(Self::from_json).collect(),
            )),
            Value::Null | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MetadataValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Parsed frontmatter block of one note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Frontmatter {
    entries: BTreeMap<String, MetadataValue>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let entries = object
            .iter()
            .filter_map(|(key, value)| {
                MetadataValue::from_json(value).map(|value| (key.clone(), value))
            })
            .collect();
        Self { entries }
    }

    /// Builder-style insert, mostly for callers assembling metadata by hand.
    pub fn with(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetadataValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetadataValue::as_str)
    }

    pub fn get_number(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(MetadataValue::as_number)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(MetadataValue::as_bool)
    }

    /// String entries of a list value; non-string items are skipped.
    pub fn get_string_list(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key)
            .and_then(MetadataValue::as_list)
            .map(|items| items.iter().filter_map(MetadataValue::as_str).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Map<String, Value>> for Frontmatter {
    fn from(value: Map<String, Value>) -> Self {
        Self::from_json_object(&value)
    }
}

/// One candidate note handed over by the metadata provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoteInput {
    /// File basename, used as the title fallback.
    pub name: String,
    /// `None` when the note has no frontmatter block at all.
    #[serde(default)]
    pub frontmatter: Option<Frontmatter>,
    /// Inline tags as found in the body, usually with a leading `#`.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Full raw markdown, frontmatter included.
    #[serde(default)]
    pub text: String,
}

impl NoteInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_frontmatter(mut self, frontmatter: Frontmatter) -> Self {
        self.frontmatter = Some(frontmatter);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}
