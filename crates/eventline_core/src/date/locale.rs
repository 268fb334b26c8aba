//! Localization seam for dictionary display strings.
//!
//! The core never performs i18n itself: presets ask a [`Localizer`] for
//! opaque strings by key when they are built.

use std::collections::BTreeMap;

/// Supplies display strings by translation key.
pub trait Localizer: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Echoes every key back; useful when no translations are loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyLocalizer;

impl Localizer for KeyLocalizer {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Map-backed localizer; unknown keys fall back to the key itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticLocalizer {
    entries: BTreeMap<String, String>,
}

const ENGLISH: &[(&str, &str)] = &[
    ("months.january", "January"),
    ("months.february", "February"),
    ("months.march", "March"),
    ("months.april", "April"),
    ("months.may", "May"),
    ("months.june", "June"),
    ("months.july", "July"),
    ("months.august", "August"),
    ("months.september", "September"),
    ("months.october", "October"),
    ("months.november", "November"),
    ("months.december", "December"),
    ("harptos.hammer", "Hammer"),
    ("harptos.alturiak", "Alturiak"),
    ("harptos.ches", "Ches"),
    ("harptos.tarsakh", "Tarsakh"),
    ("harptos.mirtul", "Mirtul"),
    ("harptos.kythorn", "Kythorn"),
    ("harptos.flamerule", "Flamerule"),
    ("harptos.eleasis", "Eleasis"),
    ("harptos.eleint", "Eleint"),
    ("harptos.marpenoth", "Marpenoth"),
    ("harptos.uktar", "Uktar"),
    ("harptos.nightal", "Nightal"),
    ("cycles.empriclus", "Empriclus"),
    ("cycles.apiclus", "Apiclus"),
    ("cycles.finiclus", "Finiclus"),
    ("weeks.eribrus", "Eribrus"),
    ("weeks.valebrus", "Valebrus"),
    ("weeks.andrebrus", "Andrebrus"),
    ("weeks.sigurbrus", "Sigurbrus"),
    ("weeks.marbrus", "Marbrus"),
    ("weeks.susabris", "Susabris"),
    ("weeks.melubris", "Melubris"),
    ("weeks.jabrus", "Jabrus"),
    ("weeks.vinzebrus", "Vinzebrus"),
    ("weeks.leobrus", "Leobrus"),
    ("weeks.cecibris", "Cecibris"),
    ("weeks.talebris", "Talebris"),
    ("weeks.volcebrus", "Volcebrus"),
];

impl StaticLocalizer {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// English strings for every key used by the built-in presets.
    pub fn english() -> Self {
        Self::new(
            ENGLISH
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localizer for StaticLocalizer {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyLocalizer, Localizer, StaticLocalizer};

    #[test]
    fn static_localizer_falls_back_to_key() {
        let mut localizer = StaticLocalizer::english();
        assert_eq!(localizer.translate("months.march"), "March");
        assert_eq!(localizer.translate("months.smarch"), "months.smarch");
        localizer.insert("months.march", "Mars");
        assert_eq!(localizer.translate("months.march"), "Mars");
    }

    #[test]
    fn key_localizer_echoes() {
        assert_eq!(KeyLocalizer.translate("weeks.jabrus"), "weeks.jabrus");
    }
}
