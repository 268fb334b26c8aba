//! [`AbstractDate`] to display text through token rules.

use super::{AbstractDate, ConditionalFormatRule, DateTokenConfiguration, DateTokenType};

pub type FormatResult<T> = Result<T, FormatError>;

/// Date cannot be rendered with the given configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error(
        "dictionary index out of range for component `{component}`: {value} (dictionary has {len} entries)"
    )]
    DictionaryIndexOutOfRange {
        component: String,
        value: i64,
        len: usize,
    },
}

/// Renders `date` into `display_template`.
///
/// The template is scanned once; each `{group}` naming an entry of
/// `group_priority` is rendered through its token configuration (plain
/// number when none is configured). Rendered text is never rescanned, so a
/// value containing `{other}` is kept as is. A component that is missing or
/// renders empty is dropped together with the literal text joining it to
/// its neighbour; text before the first and after the last placeholder is
/// kept. The result is trimmed.
///
/// # Errors
/// `DictionaryIndexOutOfRange` when a dictionary token's value is negative
/// or past the end of its dictionary.
pub fn format_date(
    date: &AbstractDate,
    display_template: &str,
    group_priority: &[String],
    tokens: &[DateTokenConfiguration],
    apply_conditional_formatting: bool,
) -> FormatResult<String> {
    let mut output = String::new();
    let mut pending_separator = "";
    let mut seen_placeholder = false;
    let mut rendered_any = false;

    for piece in split_template(display_template, group_priority) {
        match piece {
            TemplatePiece::Literal(text) if seen_placeholder => pending_separator = text,
            TemplatePiece::Literal(text) => output.push_str(text),
            TemplatePiece::Placeholder(index) => {
                seen_placeholder = true;
                let rendered = render_component(
                    date.component(index),
                    &group_priority[index],
                    tokens,
                    apply_conditional_formatting,
                )?;
                if !rendered.is_empty() {
                    if rendered_any {
                        output.push_str(pending_separator);
                    }
                    output.push_str(&rendered);
                    rendered_any = true;
                }
                pending_separator = "";
            }
        }
    }
    output.push_str(pending_separator);

    Ok(output.trim().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplatePiece<'a> {
    Literal(&'a str),
    /// Index into the group priority.
    Placeholder(usize),
}

// Braces that do not enclose a known group name stay literal text.
fn split_template<'a>(template: &'a str, group_priority: &[String]) -> Vec<TemplatePiece<'a>> {
    let mut pieces = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = template[cursor..].find('{') {
        let open = cursor + offset;
        let Some(length) = template[open..].find('}') else {
            break;
        };
        let close = open + length;
        let name = &template[open + 1..close];
        match group_priority.iter().position(|group| group == name) {
            Some(index) => {
                if literal_start < open {
                    pieces.push(TemplatePiece::Literal(&template[literal_start..open]));
                }
                pieces.push(TemplatePiece::Placeholder(index));
                literal_start = close + 1;
                cursor = close + 1;
            }
            None => cursor = open + 1,
        }
    }
    if literal_start < template.len() {
        pieces.push(TemplatePiece::Literal(&template[literal_start..]));
    }
    pieces
}

fn render_component(
    value: Option<i64>,
    group: &str,
    tokens: &[DateTokenConfiguration],
    apply_conditional_formatting: bool,
) -> FormatResult<String> {
    let Some(value) = value else {
        return Ok(String::new());
    };
    match tokens.iter().find(|token| token.name == group) {
        Some(token) => render_token(value, token, apply_conditional_formatting),
        None => Ok(pad_number(value, 1)),
    }
}

fn render_token(
    value: i64,
    token: &DateTokenConfiguration,
    apply_conditional_formatting: bool,
) -> FormatResult<String> {
    let base = match token.kind {
        DateTokenType::Number => pad_number(value, token.min_length),
        DateTokenType::String => lookup(value, token)?,
    };
    if !apply_conditional_formatting {
        return Ok(base);
    }
    Ok(apply_rules(value, base, &token.formatting))
}

fn apply_rules(value: i64, base: String, rules: &[ConditionalFormatRule]) -> String {
    let mut output = base;
    for rule in rules {
        if !rule.matches(value) {
            continue;
        }
        output = rule.apply(&output);
        if rule.conditions_are_exclusive {
            break;
        }
    }
    output
}

fn lookup(value: i64, token: &DateTokenConfiguration) -> FormatResult<String> {
    usize::try_from(value)
        .ok()
        .and_then(|index| token.dictionary.get(index))
        .cloned()
        .ok_or_else(|| FormatError::DictionaryIndexOutOfRange {
            component: token.name.clone(),
            value,
            len: token.dictionary.len(),
        })
}

/// Zero-pads the magnitude to `min_length` digits, keeping the sign.
fn pad_number(value: i64, min_length: usize) -> String {
    let digits = value.unsigned_abs().to_string();
    let padded = format!("{digits:0>min_length$}");
    if value < 0 {
        format!("-{padded}")
    } else {
        padded
    }
}

#[cfg(test)]
mod tests {
    use super::{format_date, pad_number, split_template, FormatError, TemplatePiece};
    use crate::date::{
        AbstractDate, Condition, ConditionEvaluation, ConditionalFormatRule,
        DateTokenConfiguration,
    };

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn ordinal_day() -> DateTokenConfiguration {
        DateTokenConfiguration::number("day", 1).with_formatting(vec![
            ConditionalFormatRule::exclusive(Condition::Equal, 1, "{value}st"),
            ConditionalFormatRule::exclusive(Condition::Equal, 2, "{value}nd"),
            ConditionalFormatRule::exclusive(Condition::Greater, 3, "{value}th"),
        ])
    }

    fn format_day(value: i64) -> String {
        format_date(
            &AbstractDate::from_values([value]),
            "{day}",
            &groups(&["day"]),
            &[ordinal_day()],
            true,
        )
        .unwrap()
    }

    #[test]
    fn pads_and_keeps_sign() {
        assert_eq!(pad_number(7, 2), "07");
        assert_eq!(pad_number(2024, 2), "2024");
        assert_eq!(pad_number(-5, 3), "-005");
        assert_eq!(pad_number(0, 0), "0");
    }

    #[test]
    fn substitutes_placeholders_in_template_order() {
        let tokens = vec![
            DateTokenConfiguration::number("year", 1),
            DateTokenConfiguration::number("month", 1),
            DateTokenConfiguration::number("day", 1),
        ];
        let out = format_date(
            &AbstractDate::from_values([2024, 3, 7]),
            "{day}/{month}/{year}",
            &groups(&["year", "month", "day"]),
            &tokens,
            false,
        )
        .unwrap();
        assert_eq!(out, "7/3/2024");
    }

    #[test]
    fn exclusive_rules_pick_first_match() {
        assert_eq!(format_day(1), "1st");
        assert_eq!(format_day(2), "2nd");
        assert_eq!(format_day(5), "5th");
        assert_eq!(format_day(3), "3");
    }

    #[test]
    fn exclusive_rule_with_alternative_evaluations() {
        let day = DateTokenConfiguration::number("day", 1).with_formatting(vec![
            ConditionalFormatRule::any_of(
                vec![
                    ConditionEvaluation::new(Condition::Equal, 1),
                    ConditionEvaluation::new(Condition::Equal, 21),
                ],
                "{value}st",
            ),
            ConditionalFormatRule::exclusive(Condition::GreaterOrEqual, 1, "{value}th"),
        ]);
        let render = |value: i64| {
            format_date(
                &AbstractDate::from_values([value]),
                "{day}",
                &groups(&["day"]),
                std::slice::from_ref(&day),
                true,
            )
            .unwrap()
        };
        assert_eq!(render(21), "21st");
        assert_eq!(render(1), "1st");
        assert_eq!(render(11), "11th");
    }

    #[test]
    fn disabled_conditional_formatting_renders_plain_value() {
        let out = format_date(
            &AbstractDate::from_values([2]),
            "{day}",
            &groups(&["day"]),
            &[ordinal_day()],
            false,
        )
        .unwrap();
        assert_eq!(out, "2");
    }

    #[test]
    fn chained_rules_feed_later_rules() {
        let token = DateTokenConfiguration::number("year", 1).with_formatting(vec![
            ConditionalFormatRule::chained(
                vec![ConditionEvaluation::new(Condition::Less, 0)],
                "{value} BC",
            ),
            ConditionalFormatRule::exclusive(Condition::Less, -1000, "~{value}"),
        ]);
        let render = |year: i64| {
            format_date(
                &AbstractDate::from_values([year]),
                "{year}",
                &groups(&["year"]),
                std::slice::from_ref(&token),
                true,
            )
            .unwrap()
        };
        assert_eq!(render(-50), "-50 BC");
        assert_eq!(render(-2000), "~-2000 BC");
        assert_eq!(render(800), "800");
    }

    #[test]
    fn dictionary_lookup_and_range_error() {
        let token = DateTokenConfiguration::string(
            "month",
            vec!["".to_string(), "Jan".to_string(), "Feb".to_string()],
        );
        let template = "{month}";
        let group = groups(&["month"]);
        let ok = format_date(
            &AbstractDate::from_values([2]),
            template,
            &group,
            std::slice::from_ref(&token),
            false,
        )
        .unwrap();
        assert_eq!(ok, "Feb");

        let err = format_date(
            &AbstractDate::from_values([5]),
            template,
            &group,
            std::slice::from_ref(&token),
            false,
        )
        .unwrap_err();
        assert_eq!(
            err,
            FormatError::DictionaryIndexOutOfRange {
                component: "month".to_string(),
                value: 5,
                len: 3,
            }
        );

        let negative = format_date(
            &AbstractDate::from_values([-1]),
            template,
            &group,
            std::slice::from_ref(&token),
            false,
        );
        assert!(negative.is_err());
    }

    #[test]
    fn missing_and_unreferenced_components_are_not_shown() {
        let out = format_date(
            &AbstractDate::new(vec![Some(1200), None, Some(4)]),
            "{day} {month} {year}",
            &groups(&["year", "month", "day"]),
            &[],
            false,
        )
        .unwrap();
        assert_eq!(out, "4 1200");

        let year_only = format_date(
            &AbstractDate::from_values([1200, 5, 4]),
            "Year {year}",
            &groups(&["year", "month", "day"]),
            &[],
            false,
        )
        .unwrap();
        assert_eq!(year_only, "Year 1200");
    }

    #[test]
    fn rendered_text_is_not_rescanned_for_placeholders() {
        let era = DateTokenConfiguration::string(
            "era",
            vec!["".to_string(), "{month}".to_string()],
        );
        let out = format_date(
            &AbstractDate::from_values([1, 7]),
            "{era} {month}",
            &groups(&["era", "month"]),
            &[era],
            false,
        )
        .unwrap();
        assert_eq!(out, "{month} 7");
    }

    #[test]
    fn separators_next_to_missing_components_are_dropped() {
        let template = "{day}/{month}/{year}";
        let priority = groups(&["year", "month", "day"]);
        let render =
            |date: AbstractDate| format_date(&date, template, &priority, &[], false).unwrap();
        assert_eq!(render(AbstractDate::new(vec![Some(-300), None, None])), "-300");
        assert_eq!(render(AbstractDate::new(vec![Some(1200), Some(5), None])), "5/1200");
        assert_eq!(render(AbstractDate::new(vec![Some(1200), None, Some(4)])), "4/1200");

        let framed = format_date(
            &AbstractDate::new(vec![Some(1372), None, None]),
            "{day} {month} {year} DR",
            &priority,
            &[],
            false,
        )
        .unwrap();
        assert_eq!(framed, "1372 DR");
    }

    #[test]
    fn unknown_braces_stay_literal() {
        let pieces = split_template("{{year}} {era}", &groups(&["year"]));
        assert_eq!(
            pieces,
            vec![
                TemplatePiece::Literal("{"),
                TemplatePiece::Placeholder(0),
                TemplatePiece::Literal("} {era}"),
            ]
        );
    }
}
