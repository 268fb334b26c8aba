//! Per-component rendering rules.

use serde::{Deserialize, Serialize};

/// Comparison used by a conditional format evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Greater,
    Less,
    Equal,
    NotEqual,
    GreaterOrEqual,
    LessOrEqual,
}

impl Condition {
    /// Returns whether `value OP threshold` holds.
    pub fn holds(self, value: i64, threshold: i64) -> bool {
        match self {
            Self::Greater => value > threshold,
            Self::Less => value < threshold,
            Self::Equal => value == threshold,
            Self::NotEqual => value != threshold,
            Self::GreaterOrEqual => value >= threshold,
            Self::LessOrEqual => value <= threshold,
        }
    }
}

/// One `value OP threshold` check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionEvaluation {
    pub condition: Condition,
    pub value: i64,
}

impl ConditionEvaluation {
    pub fn new(condition: Condition, value: i64) -> Self {
        Self { condition, value }
    }
}

/// Value-dependent template for one component.
///
/// Exclusive evaluations are alternatives: the rule applies as soon as one
/// of them holds, and an applied exclusive rule stops evaluation of the rules
/// after it. Otherwise every evaluation must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalFormatRule {
    pub evaluations: Vec<ConditionEvaluation>,
    #[serde(default)]
    pub conditions_are_exclusive: bool,
    /// Template containing a `{value}` placeholder.
    pub format: String,
}

impl ConditionalFormatRule {
    /// Exclusive rule with a single evaluation.
    pub fn exclusive(condition: Condition, value: i64, format: impl Into<String>) -> Self {
        Self::any_of(vec![ConditionEvaluation::new(condition, value)], format)
    }

    /// Exclusive rule applied when any of `evaluations` holds.
    pub fn any_of(evaluations: Vec<ConditionEvaluation>, format: impl Into<String>) -> Self {
        Self {
            evaluations,
            conditions_are_exclusive: true,
            format: format.into(),
        }
    }

    /// Non-exclusive rule; its output feeds the rules after it.
    pub fn chained(evaluations: Vec<ConditionEvaluation>, format: impl Into<String>) -> Self {
        Self {
            evaluations,
            conditions_are_exclusive: false,
            format: format.into(),
        }
    }

    pub fn matches(&self, value: i64) -> bool {
        let holds =
            |evaluation: &ConditionEvaluation| evaluation.condition.holds(value, evaluation.value);
        if self.conditions_are_exclusive {
            self.evaluations.iter().any(holds)
        } else {
            self.evaluations.iter().all(holds)
        }
    }

    /// Substitutes `{value}` in the template.
    pub fn apply(&self, rendered: &str) -> String {
        self.format.replace("{value}", rendered)
    }
}

/// How a component value is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateTokenType {
    /// Zero-padded number.
    Number,
    /// Dictionary lookup using the value as a zero-based index.
    String,
}

fn default_min_length() -> usize {
    1
}

/// Rendering rules for one named component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTokenConfiguration {
    /// Must match a group of the preset's group priority.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DateTokenType,
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default)]
    pub dictionary: Vec<String>,
    #[serde(default)]
    pub formatting: Vec<ConditionalFormatRule>,
}

impl DateTokenConfiguration {
    pub fn number(name: impl Into<String>, min_length: usize) -> Self {
        Self {
            name: name.into(),
            kind: DateTokenType::Number,
            min_length,
            dictionary: Vec::new(),
            formatting: Vec::new(),
        }
    }

    pub fn string(name: impl Into<String>, dictionary: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: DateTokenType::String,
            min_length: default_min_length(),
            dictionary,
            formatting: Vec::new(),
        }
    }

    pub fn with_formatting(mut self, formatting: Vec<ConditionalFormatRule>) -> Self {
        self.formatting = formatting;
        self
    }
}
