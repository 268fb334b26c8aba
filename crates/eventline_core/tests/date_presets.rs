use eventline_core::date::{
    Condition, ConditionalFormatRule, DateTokenConfiguration, KeyLocalizer,
};
use eventline_core::{
    compare_dates, format_date, parse_abstract_date, AbstractDate, DateConfiguration,
    DatePreset, EndDate, FormatError, PresetRegistry, RawDateValue, StaticLocalizer,
};
use std::cmp::Ordering;

fn groups(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

#[test]
fn numeric_value_fills_subordinate_units_with_one() {
    let date = parse_abstract_date(
        &groups("year,cycle,week,day"),
        RawDateValue::Number(100),
        r"(?<year>-?[0-9]+)(?:/(?<cycle>[0-9]+))?(?:/(?<week>[0-9]+))?(?:/(?<day>[0-9]+))?",
    )
    .unwrap();
    assert_eq!(date, AbstractDate::from_values([100, 1, 1, 1]));
}

#[test]
fn unmatched_text_is_absent() {
    let date = parse_abstract_date(
        &groups("year,month"),
        RawDateValue::Text("the age of legends"),
        r"(?<year>-?[0-9]+)-(?<month>[0-9]+)",
    );
    assert_eq!(date, None);
}

#[test]
fn comparator_orders_dates_and_ongoing() {
    let first = AbstractDate::from_values([2024, 1, 1]);
    let second = AbstractDate::from_values([2024, 1, 2]);
    assert_eq!(compare_dates(&first, &second), Ordering::Less);
    assert_eq!(compare_dates(&second, &first), Ordering::Greater);
    assert_eq!(compare_dates(&first, &first.clone()), Ordering::Equal);

    let partial = AbstractDate::new(vec![Some(2024), None, None]);
    assert!(partial < first);

    let mut ends = vec![
        EndDate::Ongoing,
        EndDate::Date(second.clone()),
        EndDate::Date(first.clone()),
    ];
    ends.sort();
    assert_eq!(
        ends,
        vec![EndDate::Date(first), EndDate::Date(second), EndDate::Ongoing]
    );
}

#[test]
fn ordinal_rules_apply_only_when_enabled() {
    let day = DateTokenConfiguration::number("day", 1).with_formatting(vec![
        ConditionalFormatRule::exclusive(Condition::Equal, 1, "{value}st"),
        ConditionalFormatRule::exclusive(Condition::Equal, 2, "{value}nd"),
        ConditionalFormatRule::exclusive(Condition::Greater, 3, "{value}th"),
    ]);
    let render = |value: i64, enabled: bool| {
        format_date(
            &AbstractDate::from_values([value]),
            "{day}",
            &groups("day"),
            std::slice::from_ref(&day),
            enabled,
        )
        .unwrap()
    };
    assert_eq!(render(2, true), "2nd");
    assert_eq!(render(5, true), "5th");
    assert_eq!(render(2, false), "2");
}

#[test]
fn dictionary_out_of_range_is_a_format_error() {
    let month = DateTokenConfiguration::string(
        "month",
        vec!["".to_string(), "Jan".to_string(), "Feb".to_string()],
    );
    let err = format_date(
        &AbstractDate::from_values([5]),
        "{month}",
        &groups("month"),
        &[month],
        false,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        FormatError::DictionaryIndexOutOfRange { value: 5, len: 3, .. }
    ));
}

#[test]
fn builtin_registry_formats_each_calendar() {
    let registry = PresetRegistry::builtin(&StaticLocalizer::english()).unwrap();
    assert_eq!(registry.len(), 5);

    let render = |name: &str, raw: RawDateValue<'_>| {
        let preset = registry.get(name).unwrap();
        let date = preset.parse(raw).unwrap();
        preset.format(&date).unwrap()
    };
    assert_eq!(render("normal", RawDateValue::Text("2024-03-07")), "07/03/2024");
    assert_eq!(render("imperial", RawDateValue::Text("999.M41")), "999.M41");
    assert_eq!(render("verbose-day", RawDateValue::Text("2024-03-07")), "7th March 2024");
    assert_eq!(
        render("harptos-dalereckoning", RawDateValue::Text("1372-7-4")),
        "4th Flamerule 1372 DR"
    );
    assert_eq!(
        render("malanachan-calendar", RawDateValue::Text("1502-3-7-2")),
        "2nd Melubris, Finiclus 1502"
    );
}

#[test]
fn custom_preset_from_configuration() {
    let configuration = DateConfiguration {
        date_display_format: "Year {year}, {season}".to_string(),
        date_parser_group_priority: "year,season".to_string(),
        date_parser_regex: r"(?<year>[0-9]+)(?:\.(?<season>[1-4]))?".to_string(),
        apply_additional_condition_formatting: true,
        date_token_configuration: vec![
            DateTokenConfiguration::number("year", 4),
            DateTokenConfiguration::string(
                "season",
                ["", "spring", "summer", "autumn", "winter"]
                    .iter()
                    .map(|season| season.to_string())
                    .collect(),
            )
            .with_formatting(vec![ConditionalFormatRule::exclusive(
                Condition::Equal,
                4,
                "deep {value}",
            )]),
        ],
    };
    let preset = DatePreset::new("seasons", configuration).unwrap();
    let date = preset.parse(RawDateValue::Text("812.4")).unwrap();
    assert_eq!(preset.format(&date).unwrap(), "Year 0812, deep winter");

    let year_only = preset.parse(RawDateValue::Text("812")).unwrap();
    assert_eq!(preset.format(&year_only).unwrap(), "Year 0812");
}

#[test]
fn presets_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DatePreset>();
    assert_send_sync::<PresetRegistry>();

    let registry = PresetRegistry::builtin(&KeyLocalizer).unwrap();
    let preset = registry.get("normal").unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=4)
            .map(|day| {
                scope.spawn(move || {
                    let raw = format!("2000-01-{day:02}");
                    let date = preset.parse(RawDateValue::Text(&raw)).unwrap();
                    preset.format(&date).unwrap()
                })
            })
            .collect();
        let rendered: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(rendered, vec!["01/01/2000", "02/01/2000", "03/01/2000", "04/01/2000"]);
    });
}
