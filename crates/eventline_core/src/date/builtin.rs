//! Built-in presets.

use super::{
    Condition, ConditionEvaluation, ConditionalFormatRule, DateConfiguration, DatePreset,
    DateTokenConfiguration, Localizer, PresetResult,
};

const YEAR_MONTH_DAY_PATTERN: &str =
    r"(?<year>-?[0-9]+)(?:-(?<month>[0-9]{1,2}))?(?:-(?<day>[0-9]{1,2}))?";

const MONTH_KEYS: [&str; 12] = [
    "months.january",
    "months.february",
    "months.march",
    "months.april",
    "months.may",
    "months.june",
    "months.july",
    "months.august",
    "months.september",
    "months.october",
    "months.november",
    "months.december",
];

const HARPTOS_MONTH_KEYS: [&str; 12] = [
    "harptos.hammer",
    "harptos.alturiak",
    "harptos.ches",
    "harptos.tarsakh",
    "harptos.mirtul",
    "harptos.kythorn",
    "harptos.flamerule",
    "harptos.eleasis",
    "harptos.eleint",
    "harptos.marpenoth",
    "harptos.uktar",
    "harptos.nightal",
];

const CYCLE_KEYS: [&str; 3] = ["cycles.empriclus", "cycles.apiclus", "cycles.finiclus"];

const WEEK_KEYS: [&str; 13] = [
    "weeks.eribrus",
    "weeks.valebrus",
    "weeks.andrebrus",
    "weeks.sigurbrus",
    "weeks.marbrus",
    "weeks.susabris",
    "weeks.melubris",
    "weeks.jabrus",
    "weeks.vinzebrus",
    "weeks.leobrus",
    "weeks.cecibris",
    "weeks.talebris",
    "weeks.volcebrus",
];

/// `year-month-day` parsed, `day/month/year` displayed with two-digit
/// day and month.
pub(crate) fn normal_configuration() -> DateConfiguration {
    DateConfiguration {
        date_display_format: "{day}/{month}/{year}".to_string(),
        date_parser_group_priority: "year,month,day".to_string(),
        date_parser_regex: YEAR_MONTH_DAY_PATTERN.to_string(),
        apply_additional_condition_formatting: false,
        date_token_configuration: vec![
            DateTokenConfiguration::number("year", 1),
            DateTokenConfiguration::number("month", 2),
            DateTokenConfiguration::number("day", 2),
        ],
    }
}

pub fn normal_preset() -> PresetResult<DatePreset> {
    DatePreset::new("normal", normal_configuration())
}

/// Imperial dating: `999.M41` is the last year of the 41st millennium.
///
/// The year within the millennium is required in text input; a bare number
/// is read as a millennium starting at year `001`.
pub fn imperial_preset() -> PresetResult<DatePreset> {
    let configuration = DateConfiguration {
        date_display_format: "{year}.M{millennium}".to_string(),
        date_parser_group_priority: "millennium,year".to_string(),
        date_parser_regex: r"(?<year>[0-9]{1,3})\.M(?<millennium>[0-9]{1,3})".to_string(),
        apply_additional_condition_formatting: false,
        date_token_configuration: vec![
            DateTokenConfiguration::number("millennium", 1),
            DateTokenConfiguration::number("year", 3),
        ],
    };
    DatePreset::new("imperial", configuration)
}

/// `7th March 2024` style display of `year-month-day` input.
pub fn verbose_day_preset(localizer: &dyn Localizer) -> PresetResult<DatePreset> {
    let configuration = DateConfiguration {
        date_display_format: "{day} {month} {year}".to_string(),
        date_parser_group_priority: "year,month,day".to_string(),
        date_parser_regex: YEAR_MONTH_DAY_PATTERN.to_string(),
        apply_additional_condition_formatting: true,
        date_token_configuration: vec![
            DateTokenConfiguration::number("year", 1),
            DateTokenConfiguration::string("month", dictionary(localizer, &MONTH_KEYS, "")),
            DateTokenConfiguration::number("day", 1).with_formatting(english_ordinals()),
        ],
    };
    DatePreset::new("verbose-day", configuration)
}

/// Calendar of Harptos counted in Dalereckoning years: `4th Flamerule 1372 DR`.
pub fn harptos_dalereckoning_preset(localizer: &dyn Localizer) -> PresetResult<DatePreset> {
    let configuration = DateConfiguration {
        date_display_format: "{day} {month} {year} DR".to_string(),
        date_parser_group_priority: "year,month,day".to_string(),
        date_parser_regex: YEAR_MONTH_DAY_PATTERN.to_string(),
        apply_additional_condition_formatting: true,
        date_token_configuration: vec![
            DateTokenConfiguration::number("year", 1),
            DateTokenConfiguration::string(
                "month",
                dictionary(localizer, &HARPTOS_MONTH_KEYS, ""),
            ),
            DateTokenConfiguration::number("day", 1).with_formatting(english_ordinals()),
        ],
    };
    DatePreset::new("harptos-dalereckoning", configuration)
}

/// Year, cycle, week and day of the Malanachan calendar.
pub fn malanachan_calendar_preset(localizer: &dyn Localizer) -> PresetResult<DatePreset> {
    let configuration = DateConfiguration {
        date_display_format: "{day} {week} {cycle} {year}".to_string(),
        date_parser_group_priority: "year,cycle,week,day".to_string(),
        date_parser_regex: r"(?<year>-?[0-9]+)(?:[/-](?<cycle>[1-3]))?(?:[/-](?<week>1[0-3]|[1-9]))?(?:[/-](?<day>[1-8]))?"
            .to_string(),
        apply_additional_condition_formatting: true,
        date_token_configuration: vec![
            DateTokenConfiguration::number("year", 1),
            DateTokenConfiguration::string("cycle", dictionary(localizer, &CYCLE_KEYS, "")),
            DateTokenConfiguration::string("week", dictionary(localizer, &WEEK_KEYS, ",")),
            DateTokenConfiguration::number("day", 1).with_formatting(vec![
                ConditionalFormatRule::exclusive(Condition::Equal, 0, ""),
                ConditionalFormatRule::exclusive(Condition::Equal, 1, "{value}st"),
                ConditionalFormatRule::exclusive(Condition::Equal, 2, "{value}nd"),
                ConditionalFormatRule::exclusive(Condition::Equal, 3, "{value}rd"),
                ConditionalFormatRule::exclusive(Condition::Greater, 3, "{value}th"),
            ]),
        ],
    };
    DatePreset::new("malanachan-calendar", configuration)
}

// Index 0 is left blank so that 1-based values index directly.
fn dictionary(localizer: &dyn Localizer, keys: &[&str], suffix: &str) -> Vec<String> {
    std::iter::once(String::new())
        .chain(
            keys.iter()
                .map(|key| format!("{}{suffix}", localizer.translate(key))),
        )
        .collect()
}

fn english_ordinals() -> Vec<ConditionalFormatRule> {
    vec![
        ConditionalFormatRule::any_of(equal_to(&[1, 21, 31]), "{value}st"),
        ConditionalFormatRule::any_of(equal_to(&[2, 22]), "{value}nd"),
        ConditionalFormatRule::any_of(equal_to(&[3, 23]), "{value}rd"),
        ConditionalFormatRule::exclusive(Condition::GreaterOrEqual, 1, "{value}th"),
    ]
}

fn equal_to(values: &[i64]) -> Vec<ConditionEvaluation> {
    values
        .iter()
        .map(|value| ConditionEvaluation::new(Condition::Equal, *value))
        .collect()
}
