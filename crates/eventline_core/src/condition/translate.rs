//! User-facing query language to normalized expression syntax.
//!
//! # Invariants
//! - `AND` / `OR` are rewritten only as whole, case-sensitive words.
//! - `NOT(t1, t2)` becomes `not (t1 or t2)`; groups never nest.
//! - Tag literals lose their `/` separators (`a/b` -> `a_b`).

use super::{ConditionError, ConditionExpression, ConditionResult};
use crate::tags::TAG_PATH_SEPARATOR;
use once_cell::sync::Lazy;
use regex::Regex;

static AND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bAND\b").expect("valid AND regex"));
static OR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bOR\b").expect("valid OR regex"));
static NOT_GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bNOT\s*\(([^)]*)\)").expect("valid NOT group regex"));

/// Translates a user query into the evaluator's expression syntax.
///
/// # Errors
/// - `Empty` for blank queries.
/// - `UnbalancedParentheses` when `(` and `)` do not pair up.
/// - `NestedNot` when a `NOT(...)` group contains another group.
/// - `EmptyNotTerm` for `NOT()` or `NOT(a,,b)`.
pub fn translate(query: &str) -> ConditionResult<ConditionExpression> {
    if query.trim().is_empty() {
        return Err(ConditionError::Empty);
    }
    check_balanced(query)?;

    let with_and = AND_RE.replace_all(query, "and");
    let with_or = OR_RE.replace_all(&with_and, "or");
    let with_not = expand_not_groups(&with_or)?;
    // Every remaining `/` sits inside an identifier-like token.
    let normalized = with_not.replace(TAG_PATH_SEPARATOR, "_");

    Ok(ConditionExpression::from_normalized(normalized.trim()))
}

/// Builds a query equivalent to the older required/excluded tag lists.
///
/// A note used to match when it carried at least one of `tags_to_find` and
/// none of `not_tags`. Returns `None` when `tags_to_find` is empty, because
/// such a configuration never selected any note.
pub fn legacy_condition(tags_to_find: &[String], not_tags: &[String]) -> Option<String> {
    let required = non_blank(tags_to_find);
    if required.is_empty() {
        return None;
    }

    let mut query = if required.len() == 1 {
        required[0].to_string()
    } else {
        format!("({})", required.join(" OR "))
    };

    let excluded = non_blank(not_tags);
    if !excluded.is_empty() {
        query.push_str(&format!(" AND NOT({})", excluded.join(", ")));
    }
    Some(query)
}

fn non_blank(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect()
}

fn check_balanced(query: &str) -> ConditionResult<()> {
    let mut depth = 0usize;
    for ch in query.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return Err(ConditionError::UnbalancedParentheses {
                        query: query.to_string(),
                    });
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ConditionError::UnbalancedParentheses {
            query: query.to_string(),
        });
    }
    Ok(())
}

fn expand_not_groups(input: &str) -> ConditionResult<String> {
    let mut output = String::with_capacity(input.len());
    let mut last = 0;

    for caps in NOT_GROUP_RE.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let inner = caps.get(1).map_or("", |m| m.as_str());
        if inner.contains('(') {
            return Err(ConditionError::NestedNot {
                position: whole.start(),
            });
        }

        let mut terms = Vec::new();
        for term in inner.split(',').map(str::trim) {
            if term.is_empty() {
                return Err(ConditionError::EmptyNotTerm {
                    position: whole.start(),
                });
            }
            terms.push(term.replace(TAG_PATH_SEPARATOR, "_"));
        }

        output.push_str(&input[last..whole.start()]);
        output.push_str("not (");
        output.push_str(&terms.join(" or "));
        output.push(')');
        last = whole.end();
    }

    output.push_str(&input[last..]);
    Ok(output)
}
