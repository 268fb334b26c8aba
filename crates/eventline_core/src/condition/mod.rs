//! Timeline inclusion conditions over hierarchical note tags.
//!
//! # Responsibility
//! - Translate the user-facing query language (`AND`, `OR`, `NOT(a, b)`,
//!   tag paths) into normalized expression syntax.
//! - Parse and evaluate normalized expressions against a note's expanded tags.
//!
//! # Invariants
//! - Evaluation depends only on the set of true identifiers, never on the
//!   order tags were supplied in.
//! - Malformed conditions surface as errors; they are never read as `false`.

mod expr;
mod translate;

pub use expr::{Assignment, Formula};
pub use translate::{legacy_condition, translate};

use crate::tags::{expand_tags, TagSet};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

pub type ConditionResult<T> = Result<T, ConditionError>;

/// Condition could not be translated or parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("condition is empty")]
    Empty,
    #[error("unbalanced parentheses in condition `{query}`")]
    UnbalancedParentheses { query: String },
    #[error("nested NOT(...) group at byte {position} is not supported")]
    NestedNot { position: usize },
    #[error("NOT(...) group at byte {position} contains an empty term")]
    EmptyNotTerm { position: usize },
    #[error("unexpected character `{ch}` at byte {position}")]
    UnexpectedChar { ch: char, position: usize },
    #[error("unexpected token `{token}` at byte {position}")]
    UnexpectedToken { token: String, position: usize },
    #[error("condition ended unexpectedly")]
    UnexpectedEnd,
}

/// Condition in normalized syntax (`and`, `or`, `not (...)`, identifiers).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConditionExpression(String);

impl ConditionExpression {
    /// Wraps text that is already in normalized syntax.
    pub fn from_normalized(expression: impl Into<String>) -> Self {
        Self(expression.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ConditionExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Evaluates a normalized expression against one note's tags.
///
/// # Errors
/// Returns the parse error when `expression` is malformed.
pub fn evaluate(expression: &ConditionExpression, tags: &TagSet) -> ConditionResult<bool> {
    let formula = Formula::parse(expression.as_str())?;
    Ok(evaluate_formula(&formula, tags))
}

fn evaluate_formula(formula: &Formula, tags: &TagSet) -> bool {
    let truths: BTreeSet<String> = expand_tags(tags);
    formula.evaluate(&formula.assignment(&truths))
}

/// Translated and parsed condition, reusable across every note of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCondition {
    query: String,
    expression: ConditionExpression,
    formula: Formula,
}

impl CompiledCondition {
    /// Translates and parses a user query once.
    pub fn compile(query: &str) -> ConditionResult<Self> {
        let expression = translate(query)?;
        let formula = Formula::parse(expression.as_str())?;
        Ok(Self {
            query: query.to_string(),
            expression,
            formula,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn expression(&self) -> &ConditionExpression {
        &self.expression
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Returns the inclusion decision for one note.
    pub fn matches(&self, tags: &TagSet) -> bool {
        evaluate_formula(&self.formula, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::{evaluate, translate, CompiledCondition, ConditionError, ConditionExpression};
    use crate::tags::collect_tag_set;

    #[test]
    fn parent_query_matches_child_tag() {
        let tags = collect_tag_set(["proj/x"]);
        let expression = translate("proj").unwrap();
        assert!(evaluate(&expression, &tags).unwrap());
    }

    #[test]
    fn negated_parent_excludes_child_tag() {
        let tags = collect_tag_set(["proj/x"]);
        let expression = translate("NOT(proj)").unwrap();
        assert!(!evaluate(&expression, &tags).unwrap());
    }

    #[test]
    fn child_query_does_not_match_parent_tag() {
        let tags = collect_tag_set(["proj"]);
        let condition = CompiledCondition::compile("proj/x").unwrap();
        assert!(!condition.matches(&tags));
    }

    #[test]
    fn malformed_expression_is_an_error() {
        let tags = collect_tag_set(["a"]);
        let expression = ConditionExpression::from_normalized("a and or b");
        assert!(matches!(
            evaluate(&expression, &tags),
            Err(ConditionError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn compiled_condition_keeps_query_and_expression() {
        let condition = CompiledCondition::compile("war/east AND NOT(draft, war/east/old)").unwrap();
        assert_eq!(condition.query(), "war/east AND NOT(draft, war/east/old)");
        assert_eq!(
            condition.expression().as_str(),
            "war_east and not (draft or war_east_old)"
        );
        assert!(condition.matches(&collect_tag_set(["war/east/front"])));
        assert!(!condition.matches(&collect_tag_set(["war/east/old"])));
        assert!(!condition.matches(&collect_tag_set(["war/east", "draft"])));
    }
}
