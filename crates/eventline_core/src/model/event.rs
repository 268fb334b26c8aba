//! Event records produced for included notes.
//!
//! # Invariants
//! - `title` is never empty: the note name is used when no override exists.
//! - Events order by start date, then end date, then note name.

use crate::date::{AbstractDate, EndDate};
use serde::Serialize;
use std::cmp::Ordering;

/// Image reference found in a note or its override field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "src", rename_all = "snake_case")]
pub enum ImageSource {
    /// Vault-internal link target, left unresolved for the caller.
    Internal(String),
    /// External URL or raw path.
    External(String),
}

impl ImageSource {
    pub fn src(&self) -> &str {
        match self {
            Self::Internal(src) | Self::External(src) => src,
        }
    }
}

/// Structured event extracted from one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub note_name: String,
    pub title: String,
    pub body: Option<String>,
    pub image: Option<ImageSource>,
    pub start_date: Option<AbstractDate>,
    pub end_date: Option<EndDate>,
}

/// Timeline order: start date (absent first), end date (absent first,
/// ongoing last), then note name.
pub fn compare_events(left: &EventRecord, right: &EventRecord) -> Ordering {
    left.start_date
        .cmp(&right.start_date)
        .then_with(|| left.end_date.cmp(&right.end_date))
        .then_with(|| left.note_name.cmp(&right.note_name))
}
