//! Command-line front end over `eventline_core`.
//!
//! # Responsibility
//! - Exercise condition evaluation and date presets from a shell.
//! - Do the file reading the core deliberately leaves to its host.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eventline_core::{
    collect_tag_set, init_logging, process_notes_with_query, translate, CompiledCondition,
    LoggingConfig, NoteInput, PresetRegistry, RawDateValue, StaticLocalizer, TagSet,
    TimelineSettings,
};
use log::debug;
use std::path::Path;

mod args;
use args::{Cli, Commands};

const CLI_LOG_LEVEL: &str = "warn";

fn main() -> Result<()> {
    let cli = Cli::parse();
    let localizer = StaticLocalizer::english();
    let registry = PresetRegistry::builtin(&localizer).context("built-in presets are invalid")?;

    match cli.command {
        Commands::Eval { query, tags } => {
            start_logging(cli.log_level.as_deref(), &LoggingConfig::default())?;
            let expression = translate(&query)?;
            let condition = CompiledCondition::compile(&query)?;
            let tag_set: TagSet = collect_tag_set(&tags);
            println!("expression: {expression}");
            println!("included: {}", condition.matches(&tag_set));
        }
        Commands::Date { preset, raw } => {
            start_logging(cli.log_level.as_deref(), &LoggingConfig::default())?;
            let preset = registry
                .get(&preset)
                .ok_or_else(|| anyhow!("unknown preset `{preset}`"))?;
            let value = match raw.trim().parse::<i64>() {
                Ok(number) => RawDateValue::Number(number),
                Err(_) => RawDateValue::Text(&raw),
            };
            let date = preset.parse(value)?;
            println!("components: {}", serde_json::to_string(&date)?);
            println!("display: {}", preset.format(&date)?);
        }
        Commands::Presets => {
            for preset in registry.iter() {
                println!(
                    "{}\t{}\t{}",
                    preset.name(),
                    preset.group_priority().join(","),
                    preset.display_template()
                );
            }
        }
        Commands::Timeline {
            notes,
            query,
            settings,
            preset,
            json,
        } => {
            let mut settings = match settings {
                Some(path) => load_settings(&path)?,
                None => TimelineSettings::default(),
            };
            start_logging(cli.log_level.as_deref(), &settings.logging)?;
            if let Some(name) = preset {
                let preset = registry
                    .get(&name)
                    .ok_or_else(|| anyhow!("unknown preset `{name}`"))?;
                settings.apply_preset(preset);
            }
            let preset = settings.date_preset()?;
            let notes = load_notes(&notes)?;
            debug!("event=cli_timeline module=cli status=start notes={}", notes.len());

            let outcome = process_notes_with_query(&notes, &settings, &preset, &query);
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.entries)?);
            } else {
                for entry in &outcome.entries {
                    let range = match (&entry.start_label, &entry.end_label) {
                        (Some(start), Some(end)) => format!("{start} - {end}"),
                        (Some(start), None) => start.clone(),
                        (None, _) => "undated".to_string(),
                    };
                    println!("{range}\t{}", entry.event.title);
                }
            }
            for failure in &outcome.failures {
                eprintln!("failed: {}: {}", failure.note_name, failure.error);
            }
        }
    }
    Ok(())
}

fn start_logging(level: Option<&str>, config: &LoggingConfig) -> Result<()> {
    let level = level.unwrap_or(CLI_LOG_LEVEL);
    init_logging(&config.clone().with_level(level)).context("failed to start logging")
}

fn load_settings(path: &Path) -> Result<TimelineSettings> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings `{}`", path.display()))?;
    TimelineSettings::from_toml_str(&raw)
        .with_context(|| format!("invalid settings `{}`", path.display()))
}

fn load_notes(path: &Path) -> Result<Vec<NoteInput>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read notes `{}`", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid notes `{}`", path.display()))
}
