//! Date presets and the immutable preset registry.
//!
//! # Responsibility
//! - Bundle the parse pattern, group priority, display template and token
//!   rules of one calendar system.
//! - Validate the bundle once, at construction.
//!
//! # Invariants
//! - A [`DatePreset`] is read-only after construction and safe to share
//!   across threads.
//! - Every token name is a group of the priority; every group has a named
//!   capture in the pattern.
//! - Registry names are unique.

use super::builtin::{
    harptos_dalereckoning_preset, imperial_preset, malanachan_calendar_preset, normal_preset,
    verbose_day_preset,
};
use super::{
    format_date, parse_group_priority, AbstractDate, DateParseResult, DateParser,
    DateTokenConfiguration, DateTokenType, FormatResult, Localizer, RawDateValue,
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type PresetResult<T> = Result<T, PresetError>;

/// Preset configuration is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresetError {
    #[error("preset name must not be empty")]
    EmptyName,
    #[error("date group priority must not be empty")]
    EmptyGroupPriority,
    #[error("date group `{0}` is listed more than once")]
    DuplicateGroup(String),
    #[error("date pattern `{pattern}` is invalid: {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("date pattern has no named group `{0}`")]
    MissingGroup(String),
    #[error("token `{0}` is not a group of the date group priority")]
    UnknownToken(String),
    #[error("token `{0}` is configured more than once")]
    DuplicateToken(String),
    #[error("string token `{0}` has an empty dictionary")]
    EmptyDictionary(String),
    #[error("token `{0}` has a formatting rule without evaluations")]
    EmptyRule(String),
    #[error("preset `{0}` is registered more than once")]
    DuplicatePreset(String),
}

/// Parse and display settings of one calendar system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfiguration {
    /// Template with `{group}` placeholders.
    pub date_display_format: String,
    /// Comma-separated group names, most significant first.
    pub date_parser_group_priority: String,
    /// Pattern with one named capture group per component.
    pub date_parser_regex: String,
    pub apply_additional_condition_formatting: bool,
    pub date_token_configuration: Vec<DateTokenConfiguration>,
}

impl Default for DateConfiguration {
    fn default() -> Self {
        super::builtin::normal_configuration()
    }
}

/// Validated, immutable date preset.
#[derive(Debug, Clone)]
pub struct DatePreset {
    name: String,
    configuration: DateConfiguration,
    parser: DateParser,
}

impl DatePreset {
    /// Validates `configuration` and compiles its pattern.
    pub fn new(name: impl Into<String>, configuration: DateConfiguration) -> PresetResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PresetError::EmptyName);
        }

        let parser = DateParser::new(
            parse_group_priority(&configuration.date_parser_group_priority),
            &configuration.date_parser_regex,
        )?;
        validate_tokens(parser.group_priority(), &configuration.date_token_configuration)?;

        Ok(Self {
            name,
            configuration,
            parser,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn configuration(&self) -> &DateConfiguration {
        &self.configuration
    }

    pub fn group_priority(&self) -> &[String] {
        self.parser.group_priority()
    }

    pub fn display_template(&self) -> &str {
        &self.configuration.date_display_format
    }

    pub fn parser(&self) -> &DateParser {
        &self.parser
    }

    pub fn parse(&self, raw: RawDateValue<'_>) -> DateParseResult<AbstractDate> {
        self.parser.parse(raw)
    }

    pub fn format(&self, date: &AbstractDate) -> FormatResult<String> {
        format_date(
            date,
            &self.configuration.date_display_format,
            self.parser.group_priority(),
            &self.configuration.date_token_configuration,
            self.configuration.apply_additional_condition_formatting,
        )
    }
}

fn validate_tokens(groups: &[String], tokens: &[DateTokenConfiguration]) -> PresetResult<()> {
    let mut seen = BTreeSet::new();
    for token in tokens {
        if !groups.contains(&token.name) {
            return Err(PresetError::UnknownToken(token.name.clone()));
        }
        if !seen.insert(token.name.as_str()) {
            return Err(PresetError::DuplicateToken(token.name.clone()));
        }
        if token.kind == DateTokenType::String && token.dictionary.is_empty() {
            return Err(PresetError::EmptyDictionary(token.name.clone()));
        }
        if token.formatting.iter().any(|rule| rule.evaluations.is_empty()) {
            return Err(PresetError::EmptyRule(token.name.clone()));
        }
    }
    Ok(())
}

/// Explicit list of presets, built once and passed by reference.
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: Vec<DatePreset>,
}

impl PresetRegistry {
    pub fn new(presets: Vec<DatePreset>) -> PresetResult<Self> {
        let mut names = BTreeSet::new();
        for preset in &presets {
            if !names.insert(preset.name()) {
                return Err(PresetError::DuplicatePreset(preset.name().to_string()));
            }
        }
        Ok(Self { presets })
    }

    /// Registry of the built-in presets with strings from `localizer`.
    pub fn builtin(localizer: &dyn Localizer) -> PresetResult<Self> {
        let presets = [
            normal_preset(),
            imperial_preset(),
            verbose_day_preset(localizer),
            harptos_dalereckoning_preset(localizer),
            malanachan_calendar_preset(localizer),
        ]
        .into_iter()
        .collect::<PresetResult<Vec<_>>>()
        .inspect_err(|err| {
            warn!("event=preset_registry module=date status=error reason={err}");
        })?;
        Self::new(presets)
    }

    pub fn get(&self, name: &str) -> Option<&DatePreset> {
        self.presets.iter().find(|preset| preset.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(DatePreset::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatePreset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
