//! Core timeline logic for Eventline.
//! This crate is the single source of truth for inclusion and date invariants.

pub mod condition;
pub mod config;
pub mod date;
pub mod logging;
pub mod model;
pub mod service;
pub mod tags;

pub use condition::{
    evaluate, legacy_condition, translate, CompiledCondition, ConditionError,
    ConditionExpression, ConditionResult,
};
pub use config::{SettingsError, SettingsResult, TimelineSettings};
pub use date::{
    compare_dates, format_date, parse_abstract_date, AbstractDate, DateConfiguration,
    DateParseError, DatePreset, EndDate, FormatError, Localizer, PresetError, PresetRegistry,
    RawDateValue, StaticLocalizer,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::{compare_events, EventRecord, Frontmatter, ImageSource, MetadataValue, NoteInput};
pub use service::{
    extract_event, format_event_range, process_notes, process_notes_with_query, BatchOutcome,
    EventError, ServiceError, TimelineEntry, TimelineService,
};
pub use tags::{collect_tag_set, expand_tags, Tag, TagError, TagSet};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
