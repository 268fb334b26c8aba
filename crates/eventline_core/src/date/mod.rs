//! Calendar-agnostic dates: parsing, ordering and display.
//!
//! # Responsibility
//! - Normalize numeric or pattern-matched date text into [`AbstractDate`].
//! - Order abstract dates for timeline sorting.
//! - Render abstract dates through preset token rules.
//!
//! # Invariants
//! - Components keep the preset's group-priority order, most significant first.
//! - A missing component is `None`, distinct from a defined zero, and orders
//!   below every defined value.
//! - The ongoing end date orders after every concrete end date.

mod builtin;
mod format;
mod locale;
mod parser;
mod preset;
mod token;

pub use builtin::{
    harptos_dalereckoning_preset, imperial_preset, malanachan_calendar_preset, normal_preset,
    verbose_day_preset,
};
pub use format::{format_date, FormatError, FormatResult};
pub use locale::{KeyLocalizer, Localizer, StaticLocalizer};
pub use parser::{
    parse_abstract_date, parse_group_priority, DateParseError, DateParseResult, DateParser,
    RawDateValue,
};
pub use preset::{DateConfiguration, DatePreset, PresetError, PresetRegistry, PresetResult};
pub use token::{
    Condition, ConditionEvaluation, ConditionalFormatRule, DateTokenConfiguration, DateTokenType,
};

use serde::{Serialize, Serializer};
use std::cmp::Ordering;

/// Ordered date components, most significant first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AbstractDate {
    components: Vec<Option<i64>>,
}

impl AbstractDate {
    pub fn new(components: Vec<Option<i64>>) -> Self {
        Self { components }
    }

    /// Builds a date where every component is defined.
    pub fn from_values(values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(values.into_iter().map(Some).collect())
    }

    pub fn components(&self) -> &[Option<i64>] {
        &self.components
    }

    /// Returns the component at `index`, `None` when missing or out of range.
    pub fn component(&self, index: usize) -> Option<i64> {
        self.components.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Compares two dates component by component in priority order.
///
/// Missing components sort before defined ones. When every shared component
/// is equal, the shorter date sorts first.
pub fn compare_dates(left: &AbstractDate, right: &AbstractDate) -> Ordering {
    for (l, r) in left.components.iter().zip(right.components.iter()) {
        let ordering = match (l, r) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(l), Some(r)) => l.cmp(r),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.components.len().cmp(&right.components.len())
}

impl Ord for AbstractDate {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_dates(self, other)
    }
}

impl PartialOrd for AbstractDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// End of an event: a concrete date or still ongoing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EndDate {
    Date(AbstractDate),
    Ongoing,
}

impl EndDate {
    pub fn as_date(&self) -> Option<&AbstractDate> {
        match self {
            Self::Date(date) => Some(date),
            Self::Ongoing => None,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        matches!(self, Self::Ongoing)
    }
}

impl Ord for EndDate {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Date(l), Self::Date(r)) => compare_dates(l, r),
            (Self::Date(_), Self::Ongoing) => Ordering::Less,
            (Self::Ongoing, Self::Date(_)) => Ordering::Greater,
            (Self::Ongoing, Self::Ongoing) => Ordering::Equal,
        }
    }
}

impl PartialOrd for EndDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Ongoing is written as `true`, matching the boolean flag it is read from.
impl Serialize for EndDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Date(date) => date.serialize(serializer),
            Self::Ongoing => serializer.serialize_bool(true),
        }
    }
}
