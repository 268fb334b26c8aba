//! Timeline use-case services.
//!
//! # Responsibility
//! - Turn provider notes into sorted timeline entries.
//! - Keep extraction rules apart from batch orchestration.

pub mod extract;
pub mod timeline_service;

pub use extract::{
    collect_timeline_tags, extract_body, extract_image, read_date, read_end_date,
};
pub use timeline_service::{
    extract_event, format_event_range, process_notes, process_notes_with_query, BatchOutcome,
    EventError, EventResult, NoteFailure, TimelineEntry, TimelineService,
};

use crate::date::PresetError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A timeline view could not be set up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Preset(#[from] PresetError),
    #[error(transparent)]
    Event(#[from] EventError),
}
