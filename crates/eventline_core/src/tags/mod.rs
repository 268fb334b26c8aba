//! Hierarchical tag model and prefix expansion.
//!
//! # Responsibility
//! - Validate tag paths handed over by the note metadata provider.
//! - Expand tags into every hierarchical prefix so parent queries match
//!   notes that only carry a child tag.
//!
//! # Invariants
//! - Segments are never empty; case is preserved as supplied.
//! - Expansion output uses identifier form (segments joined by `_`), the same
//!   form the condition translator produces for tag literals.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Separator between segments of a tag path (`project/alpha`).
pub const TAG_PATH_SEPARATOR: char = '/';
/// Separator used once a tag path becomes a condition identifier.
pub const IDENTIFIER_SEPARATOR: char = '_';

pub type TagResult<T> = Result<T, TagError>;

/// Tag validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("tag must not be empty")]
    Empty,
    #[error("tag `{0}` contains an empty path segment")]
    EmptySegment(String),
    #[error("tag `{0}` contains whitespace")]
    Whitespace(String),
}

/// One hierarchical tag attached to a note.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

/// The set of tags owned by one note for one evaluation call.
pub type TagSet = BTreeSet<Tag>;

impl Tag {
    /// Parses a raw tag; a leading `#` (inline tag syntax) is dropped.
    pub fn parse(raw: &str) -> TagResult<Self> {
        let trimmed = raw.trim();
        let path = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if path.is_empty() {
            return Err(TagError::Empty);
        }
        if path.chars().any(char::is_whitespace) {
            return Err(TagError::Whitespace(path.to_string()));
        }
        if path.split(TAG_PATH_SEPARATOR).any(str::is_empty) {
            return Err(TagError::EmptySegment(path.to_string()));
        }
        Ok(Self(path.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(TAG_PATH_SEPARATOR)
    }

    /// Returns the condition identifier for the full path (`a/b` -> `a_b`).
    pub fn identifier(&self) -> String {
        self.0.replace(TAG_PATH_SEPARATOR, "_")
    }

    /// Returns every non-empty prefix of this tag in identifier form,
    /// shortest first, inclusive of the full path.
    pub fn prefixes(&self) -> Vec<String> {
        let mut prefixes = Vec::new();
        let mut current = String::new();
        for segment in self.segments() {
            if !current.is_empty() {
                current.push(IDENTIFIER_SEPARATOR);
            }
            current.push_str(segment);
            prefixes.push(current.clone());
        }
        prefixes
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Tag {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

/// Builds a tag set from raw provider values, skipping invalid entries.
pub fn collect_tag_set<I, S>(raw_tags: I) -> TagSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = TagSet::new();
    for raw in raw_tags {
        match Tag::parse(raw.as_ref()) {
            Ok(tag) => {
                set.insert(tag);
            }
            Err(err) => debug!("event=tag_skipped module=tags status=invalid reason={err}"),
        }
    }
    set
}

/// Expands every tag into all of its hierarchical prefixes.
///
/// `{"a/b/c"}` expands to `{"a", "a_b", "a_b_c"}`. Empty input yields empty
/// output.
pub fn expand_tags(tags: &TagSet) -> BTreeSet<String> {
    tags.iter().flat_map(Tag::prefixes).collect()
}
