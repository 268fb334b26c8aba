//! Raw date values to [`AbstractDate`].
//!
//! # Invariants
//! - Output length always equals the group-priority length.
//! - Numeric input fills every subordinate component with `1`.
//! - Text input fills components from named capture groups; a group that did
//!   not participate in the match stays `None`.

use super::AbstractDate;
use super::{PresetError, PresetResult};
use log::{debug, warn};
use regex::Regex;
use std::collections::BTreeSet;

pub type DateParseResult<T> = Result<T, DateParseError>;

/// Raw date could not be turned into an abstract date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("date value is empty")]
    Empty,
    #[error("date `{raw}` does not match the configured pattern")]
    PatternMismatch { raw: String },
    #[error("date component `{group}` has non-numeric value `{value}`")]
    InvalidComponent { group: String, value: String },
}

impl DateParseError {
    /// Whether the caller should simply treat the date field as absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Empty | Self::PatternMismatch { .. })
    }
}

/// Raw date value as supplied by note metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawDateValue<'a> {
    Number(i64),
    Text(&'a str),
}

/// Splits a comma-separated group priority (`"year,month,day"`).
pub fn parse_group_priority(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(str::to_string)
        .collect()
}

/// Compiled parser for one group priority and pattern.
#[derive(Debug, Clone)]
pub struct DateParser {
    group_priority: Vec<String>,
    pattern: Regex,
}

impl DateParser {
    /// Compiles `pattern` and checks it exposes every group of the priority.
    ///
    /// # Errors
    /// - `EmptyGroupPriority` / `DuplicateGroup` for bad priorities.
    /// - `InvalidPattern` when the pattern does not compile.
    /// - `MissingGroup` when a priority group has no named capture.
    pub fn new(group_priority: Vec<String>, pattern: &str) -> PresetResult<Self> {
        if group_priority.is_empty() {
            return Err(PresetError::EmptyGroupPriority);
        }
        let mut seen = BTreeSet::new();
        for group in &group_priority {
            if !seen.insert(group.as_str()) {
                return Err(PresetError::DuplicateGroup(group.clone()));
            }
        }

        let regex = Regex::new(pattern).map_err(|err| PresetError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        let names: BTreeSet<&str> = regex.capture_names().flatten().collect();
        if let Some(missing) = group_priority
            .iter()
            .find(|group| !names.contains(group.as_str()))
        {
            return Err(PresetError::MissingGroup(missing.clone()));
        }

        Ok(Self {
            group_priority,
            pattern: regex,
        })
    }

    pub fn group_priority(&self) -> &[String] {
        &self.group_priority
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn parse(&self, raw: RawDateValue<'_>) -> DateParseResult<AbstractDate> {
        match raw {
            RawDateValue::Number(value) => Ok(self.numeric_date(value)),
            RawDateValue::Text(text) => self.text_date(text),
        }
    }

    fn numeric_date(&self, value: i64) -> AbstractDate {
        let subordinate = self.group_priority.len().saturating_sub(1);
        AbstractDate::from_values(
            std::iter::once(value).chain(std::iter::repeat(1).take(subordinate)),
        )
    }

    fn text_date(&self, text: &str) -> DateParseResult<AbstractDate> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DateParseError::Empty);
        }
        let caps = self
            .pattern
            .captures(trimmed)
            .ok_or_else(|| DateParseError::PatternMismatch {
                raw: trimmed.to_string(),
            })?;

        let mut components = Vec::with_capacity(self.group_priority.len());
        for group in &self.group_priority {
            let component = match caps.name(group).map(|m| m.as_str()) {
                None | Some("") => None,
                Some(value) => Some(value.parse::<i64>().map_err(|_| {
                    DateParseError::InvalidComponent {
                        group: group.clone(),
                        value: value.to_string(),
                    }
                })?),
            };
            components.push(component);
        }

        if components.iter().all(Option::is_none) {
            return Err(DateParseError::PatternMismatch {
                raw: trimmed.to_string(),
            });
        }
        Ok(AbstractDate::new(components))
    }
}

/// Parses one raw value against an uncompiled pattern.
///
/// Returns `None` when the value is absent, does not match, or the pattern
/// itself is unusable.
pub fn parse_abstract_date(
    group_priority: &[String],
    raw: RawDateValue<'_>,
    pattern: &str,
) -> Option<AbstractDate> {
    let parser = match DateParser::new(group_priority.to_vec(), pattern) {
        Ok(parser) => parser,
        Err(err) => {
            warn!("event=date_parser_invalid module=date status=error reason={err}");
            return None;
        }
    };
    match parser.parse(raw) {
        Ok(date) => Some(date),
        Err(err) => {
            debug!("event=date_parse module=date status=absent reason={err}");
            None
        }
    }
}
