//! Timeline settings document.
//!
//! # Responsibility
//! - Mirror the settings provider contract: frontmatter keys, tag lookup
//!   flag and the active date configuration.
//! - Decode settings from TOML text; reading files is left to the host.
//!
//! # Invariants
//! - Every field has a default, so an empty document is valid.
//! - A decoded document always carries a date configuration that compiles
//!   into a [`DatePreset`].

use crate::date::{DateConfiguration, DatePreset, PresetError, PresetResult};
use crate::logging::LoggingConfig;
use log::warn;
use serde::{Deserialize, Serialize};

/// Name given to the preset built from the settings' own date configuration.
pub const CUSTOM_PRESET_NAME: &str = "custom";

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings are not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("settings date configuration is invalid: {0}")]
    Preset(#[from] PresetError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    pub metadata_key_event_start_date: String,
    pub metadata_key_event_end_date: String,
    pub metadata_key_event_title_override: String,
    pub metadata_key_event_body_override: String,
    pub metadata_key_event_picture_override: String,
    pub metadata_key_event_timeline_tag: String,
    /// Frontmatter key that must hold literal `true` for a note to render.
    pub event_render_toggle_key: String,
    /// Also match inline tags and the frontmatter `tags` field.
    pub look_for_tags_for_timeline: bool,
    /// Text shown in place of an ongoing end date.
    pub ongoing_label: String,
    pub date: DateConfiguration,
    pub logging: LoggingConfig,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            metadata_key_event_start_date: "aat-event-start-date".to_string(),
            metadata_key_event_end_date: "aat-event-end-date".to_string(),
            metadata_key_event_title_override: "aat-event-title".to_string(),
            metadata_key_event_body_override: "aat-event-body".to_string(),
            metadata_key_event_picture_override: "aat-event-picture".to_string(),
            metadata_key_event_timeline_tag: "timelines".to_string(),
            event_render_toggle_key: "aat-render-enabled".to_string(),
            look_for_tags_for_timeline: false,
            ongoing_label: "Now".to_string(),
            date: DateConfiguration::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TimelineSettings {
    /// Decodes settings and checks the date configuration compiles.
    pub fn from_toml_str(raw: &str) -> SettingsResult<Self> {
        let settings: Self = toml::from_str(raw)?;
        settings.date_preset().inspect_err(|err| {
            warn!("event=settings_load module=config status=error reason={err}");
        })?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Replaces the date configuration with the one of `preset`.
    pub fn apply_preset(&mut self, preset: &DatePreset) {
        self.date = preset.configuration().clone();
    }

    /// Compiles the date configuration into a preset named `custom`.
    pub fn date_preset(&self) -> PresetResult<DatePreset> {
        DatePreset::new(CUSTOM_PRESET_NAME, self.date.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{SettingsError, TimelineSettings};
    use crate::date::{verbose_day_preset, AbstractDate, StaticLocalizer};

    #[test]
    fn empty_document_uses_defaults() {
        let settings = TimelineSettings::from_toml_str("").unwrap();
        assert_eq!(settings, TimelineSettings::default());
        assert_eq!(settings.metadata_key_event_start_date, "aat-event-start-date");
        assert_eq!(settings.date.date_parser_group_priority, "year,month,day");
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let settings = TimelineSettings::from_toml_str(
            r#"
look_for_tags_for_timeline = true
ongoing_label = "Present"

[date]
date_display_format = "{year}"
"#,
        )
        .unwrap();
        assert!(settings.look_for_tags_for_timeline);
        assert_eq!(settings.ongoing_label, "Present");
        assert_eq!(settings.date.date_display_format, "{year}");
        assert_eq!(settings.date.date_parser_group_priority, "year,month,day");
    }

    #[test]
    fn invalid_date_configuration_is_rejected() {
        let err = TimelineSettings::from_toml_str(
            r#"
[date]
date_parser_group_priority = "year,era"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::Preset(_)));

        let err = TimelineSettings::from_toml_str("look_for_tags_for_timeline = 3").unwrap_err();
        assert!(matches!(err, SettingsError::Toml(_)));
    }

    #[test]
    fn applied_preset_round_trips_through_toml() {
        let mut settings = TimelineSettings::default();
        settings.apply_preset(&verbose_day_preset(&StaticLocalizer::english()).unwrap());

        let encoded = settings.to_toml_string().unwrap();
        let decoded = TimelineSettings::from_toml_str(&encoded).unwrap();
        assert_eq!(decoded, settings);

        let preset = decoded.date_preset().unwrap();
        assert_eq!(preset.name(), "custom");
        assert_eq!(
            preset.format(&AbstractDate::from_values([2024, 3, 2])).unwrap(),
            "2nd March 2024"
        );
    }
}
