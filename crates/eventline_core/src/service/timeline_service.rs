//! Timeline use-case service.
//!
//! # Responsibility
//! - Decide whether a note belongs to a timeline view and build its event.
//! - Process note batches in parallel and sort the included events.
//! - Render event date ranges through the active preset.
//!
//! # Invariants
//! - A note is only included when it has frontmatter, its render toggle is
//!   literally `true` and the view condition holds for its tags.
//! - One failing note never aborts a batch; failures are reported per note.
//! - Batch output order is independent of input order.

use super::extract::{
    collect_timeline_tags, extract_body, extract_image, read_date, read_end_date,
};
use super::ServiceResult;
use crate::condition::{CompiledCondition, ConditionError};
use crate::config::TimelineSettings;
use crate::date::{DateParseError, DatePreset, EndDate, FormatError};
use crate::model::{compare_events, EventRecord, NoteInput};
use crate::tags::collect_tag_set;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

pub type EventResult<T> = Result<T, EventError>;

/// Failure to turn one note into a timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("condition could not be evaluated: {0}")]
    Condition(#[from] ConditionError),
    #[error("date could not be parsed: {0}")]
    Date(#[from] DateParseError),
    #[error("date could not be formatted: {0}")]
    Format(#[from] FormatError),
}

/// Included event with its rendered date labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub event: EventRecord,
    pub start_label: Option<String>,
    pub end_label: Option<String>,
}

/// Note that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFailure {
    pub note_name: String,
    pub error: EventError,
}

/// Result of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Included events in timeline order.
    pub entries: Vec<TimelineEntry>,
    /// Failed notes, sorted by note name.
    pub failures: Vec<NoteFailure>,
    /// Notes excluded by metadata or condition.
    pub excluded: usize,
}

/// Builds the event of `note` for the view described by `condition`.
///
/// Returns `Ok(None)` when the note is excluded from the view.
pub fn extract_event(
    note: &NoteInput,
    settings: &TimelineSettings,
    preset: &DatePreset,
    condition: &CompiledCondition,
) -> EventResult<Option<EventRecord>> {
    let Some(frontmatter) = note.frontmatter.as_ref() else {
        debug!("event=note_excluded module=timeline status=skipped reason=no_frontmatter");
        return Ok(None);
    };
    if frontmatter.get_bool(&settings.event_render_toggle_key) != Some(true) {
        debug!("event=note_excluded module=timeline status=skipped reason=render_disabled");
        return Ok(None);
    }

    let tags = collect_tag_set(collect_timeline_tags(settings, frontmatter, &note.tags));
    if !condition.matches(&tags) {
        debug!(
            "event=note_excluded module=timeline status=skipped reason=condition tag_count={}",
            tags.len()
        );
        return Ok(None);
    }

    let title = frontmatter
        .get_str(&settings.metadata_key_event_title_override)
        .filter(|title| !title.trim().is_empty())
        .unwrap_or(&note.name)
        .to_string();

    Ok(Some(EventRecord {
        note_name: note.name.clone(),
        title,
        body: extract_body(
            &note.text,
            frontmatter.get_str(&settings.metadata_key_event_body_override),
        ),
        image: extract_image(
            &note.text,
            frontmatter.get_str(&settings.metadata_key_event_picture_override),
        ),
        start_date: read_date(frontmatter, &settings.metadata_key_event_start_date, preset)?,
        end_date: read_end_date(frontmatter, &settings.metadata_key_event_end_date, preset)?,
    }))
}

/// Renders `start` or `start - end`; `None` when the event has no start date.
pub fn format_event_range(
    event: &EventRecord,
    preset: &DatePreset,
    ongoing_label: &str,
) -> EventResult<Option<String>> {
    let Some(start) = event.start_date.as_ref() else {
        return Ok(None);
    };
    let start = preset.format(start)?;
    let range = match &event.end_date {
        None => start,
        Some(end) => format!("{start} - {}", end_label(end, preset, ongoing_label)?),
    };
    Ok(Some(range))
}

fn end_label(end: &EndDate, preset: &DatePreset, ongoing_label: &str) -> EventResult<String> {
    match end {
        EndDate::Date(date) => Ok(preset.format(date)?),
        EndDate::Ongoing => Ok(ongoing_label.to_string()),
    }
}

fn build_entry(
    note: &NoteInput,
    settings: &TimelineSettings,
    preset: &DatePreset,
    condition: &CompiledCondition,
) -> EventResult<Option<TimelineEntry>> {
    let Some(event) = extract_event(note, settings, preset, condition)? else {
        return Ok(None);
    };
    let start_label = event
        .start_date
        .as_ref()
        .map(|date| preset.format(date))
        .transpose()?;
    let end_label = event
        .end_date
        .as_ref()
        .map(|end| end_label(end, preset, &settings.ongoing_label))
        .transpose()?;
    Ok(Some(TimelineEntry {
        event,
        start_label,
        end_label,
    }))
}

/// Processes a batch of notes in parallel.
pub fn process_notes(
    notes: &[NoteInput],
    settings: &TimelineSettings,
    preset: &DatePreset,
    condition: &CompiledCondition,
) -> BatchOutcome {
    let results: Vec<(&NoteInput, EventResult<Option<TimelineEntry>>)> = notes
        .par_iter()
        .map(|note| (note, build_entry(note, settings, preset, condition)))
        .collect();

    let mut outcome = BatchOutcome::default();
    for (note, result) in results {
        match result {
            Ok(Some(entry)) => outcome.entries.push(entry),
            Ok(None) => outcome.excluded += 1,
            Err(error) => {
                warn!("event=note_failed module=timeline status=error reason={error}");
                outcome.failures.push(NoteFailure {
                    note_name: note.name.clone(),
                    error,
                });
            }
        }
    }
    outcome
        .entries
        .sort_by(|left, right| compare_events(&left.event, &right.event));
    outcome
        .failures
        .sort_by(|left, right| left.note_name.cmp(&right.note_name));

    info!(
        "event=timeline_batch module=timeline status=ok notes={} included={} excluded={} failed={}",
        notes.len(),
        outcome.entries.len(),
        outcome.excluded,
        outcome.failures.len()
    );
    outcome
}

/// Compiles `query` and processes the batch.
///
/// A query that does not compile fails every note of the batch.
pub fn process_notes_with_query(
    notes: &[NoteInput],
    settings: &TimelineSettings,
    preset: &DatePreset,
    query: &str,
) -> BatchOutcome {
    match CompiledCondition::compile(query) {
        Ok(condition) => process_notes(notes, settings, preset, &condition),
        Err(err) => {
            warn!("event=condition_compile module=timeline status=error reason={err}");
            let mut failures: Vec<NoteFailure> = notes
                .iter()
                .map(|note| NoteFailure {
                    note_name: note.name.clone(),
                    error: EventError::Condition(err.clone()),
                })
                .collect();
            failures.sort_by(|left, right| left.note_name.cmp(&right.note_name));
            BatchOutcome {
                entries: Vec::new(),
                failures,
                excluded: 0,
            }
        }
    }
}

/// Owns everything one timeline view needs.
#[derive(Debug, Clone)]
pub struct TimelineService {
    settings: TimelineSettings,
    preset: DatePreset,
    condition: CompiledCondition,
}

impl TimelineService {
    /// Compiles the view condition once; the preset comes from `settings`.
    pub fn new(settings: TimelineSettings, query: &str) -> ServiceResult<Self> {
        let preset = settings.date_preset()?;
        let condition = CompiledCondition::compile(query).map_err(EventError::from)?;
        Ok(Self::with_parts(settings, preset, condition))
    }

    pub fn with_parts(
        settings: TimelineSettings,
        preset: DatePreset,
        condition: CompiledCondition,
    ) -> Self {
        Self {
            settings,
            preset,
            condition,
        }
    }

    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    pub fn preset(&self) -> &DatePreset {
        &self.preset
    }

    pub fn condition(&self) -> &CompiledCondition {
        &self.condition
    }

    pub fn extract(&self, note: &NoteInput) -> EventResult<Option<EventRecord>> {
        extract_event(note, &self.settings, &self.preset, &self.condition)
    }

    pub fn process(&self, notes: &[NoteInput]) -> BatchOutcome {
        process_notes(notes, &self.settings, &self.preset, &self.condition)
    }

    pub fn format_range(&self, event: &EventRecord) -> EventResult<Option<String>> {
        format_event_range(event, &self.preset, &self.settings.ongoing_label)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        extract_event, format_event_range, process_notes, process_notes_with_query, EventError,
    };
    use crate::condition::CompiledCondition;
    use crate::config::TimelineSettings;
    use crate::date::{normal_preset, AbstractDate, EndDate};
    use crate::model::{Frontmatter, MetadataValue, NoteInput};

    fn text(value: &str) -> MetadataValue {
        MetadataValue::String(value.to_string())
    }

    fn timeline_note(name: &str, timelines: &[&str], start: MetadataValue) -> NoteInput {
        NoteInput::new(name).with_frontmatter(
            Frontmatter::new()
                .with("aat-render-enabled", MetadataValue::Bool(true))
                .with(
                    "timelines",
                    MetadataValue::List(timelines.iter().map(|tag| text(tag)).collect()),
                )
                .with("aat-event-start-date", start),
        )
    }

    #[test]
    fn render_toggle_must_be_literal_true() {
        let settings = TimelineSettings::default();
        let preset = normal_preset().unwrap();
        let condition = CompiledCondition::compile("history").unwrap();

        let note = NoteInput::new("Quiet").with_frontmatter(
            Frontmatter::new()
                .with("aat-render-enabled", text("true"))
                .with("timelines", MetadataValue::List(vec![text("history")])),
        );
        assert_eq!(extract_event(&note, &settings, &preset, &condition), Ok(None));
        assert_eq!(
            extract_event(&NoteInput::new("Bare"), &settings, &preset, &condition),
            Ok(None)
        );
    }

    #[test]
    fn included_note_produces_event() {
        let settings = TimelineSettings::default();
        let preset = normal_preset().unwrap();
        let condition = CompiledCondition::compile("history AND NOT(draft)").unwrap();
        let mut note = timeline_note("Founding", &["history/rome"], text("-753-04-21"));
        if let Some(frontmatter) = note.frontmatter.as_mut() {
            frontmatter.insert("aat-event-title", text("Founding of Rome"));
            frontmatter.insert("aat-event-end-date", MetadataValue::Bool(true));
        }
        let note = note.with_text("---\nx: 1\n---\nA city is born.\n![map](rome.png)");

        let event = extract_event(&note, &settings, &preset, &condition)
            .unwrap()
            .unwrap();
        assert_eq!(event.title, "Founding of Rome");
        assert_eq!(event.body.as_deref(), Some("A city is born.\n![map](rome.png)"));
        assert_eq!(event.image.as_ref().map(|image| image.src()), Some("rome.png"));
        assert_eq!(event.start_date, Some(AbstractDate::from_values([-753, 4, 21])));
        assert_eq!(event.end_date, Some(EndDate::Ongoing));
        assert_eq!(
            format_event_range(&event, &preset, "Now").unwrap().as_deref(),
            Some("21/04/-753 - Now")
        );
    }

    #[test]
    fn batch_sorts_entries_and_collects_failures() {
        let settings = TimelineSettings::default();
        let preset = normal_preset().unwrap();
        let condition = CompiledCondition::compile("wars").unwrap();
        let notes = vec![
            timeline_note("Late", &["wars"], MetadataValue::Number(1900)),
            timeline_note("Broken", &["wars"], text("99999999999999999999")),
            timeline_note("Early", &["wars/ancient"], MetadataValue::Number(-490)),
            timeline_note("Elsewhere", &["peace"], MetadataValue::Number(1)),
        ];

        let outcome = process_notes(&notes, &settings, &preset, &condition);
        let names: Vec<&str> = outcome
            .entries
            .iter()
            .map(|entry| entry.event.note_name.as_str())
            .collect();
        assert_eq!(names, vec!["Early", "Late"]);
        assert_eq!(outcome.entries[0].start_label.as_deref(), Some("01/01/-490"));
        assert_eq!(outcome.excluded, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].note_name, "Broken");
        assert!(matches!(outcome.failures[0].error, EventError::Date(_)));
    }

    #[test]
    fn bad_query_fails_every_note() {
        let settings = TimelineSettings::default();
        let preset = normal_preset().unwrap();
        let notes = vec![
            timeline_note("B", &["x"], MetadataValue::Number(1)),
            timeline_note("A", &["x"], MetadataValue::Number(2)),
        ];
        let outcome = process_notes_with_query(&notes, &settings, &preset, "(x AND");
        assert!(outcome.entries.is_empty());
        let names: Vec<&str> = outcome
            .failures
            .iter()
            .map(|failure| failure.note_name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(outcome
            .failures
            .iter()
            .all(|failure| matches!(failure.error, EventError::Condition(_))));
    }
}
