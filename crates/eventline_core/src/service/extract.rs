//! Field extraction from one note's frontmatter and markdown.
//!
//! # Responsibility
//! - Gather the tags a timeline condition is evaluated against.
//! - Derive body text, image reference and start/end dates.
//!
//! # Invariants
//! - Frontmatter overrides always win over values derived from the text.
//! - Unparseable dates are treated as absent; only malformed components of a
//!   matched date are reported as errors.

use crate::config::TimelineSettings;
use crate::date::{AbstractDate, DateParseResult, DatePreset, EndDate, RawDateValue};
use crate::model::{Frontmatter, ImageSource};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static INTERNAL_OVERRIDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*!?\[\[(?<src>[^|\]]*).*\]\]\s*$").expect("valid internal override regex")
});
static INTERNAL_EMBED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[\[(?<src>[^|\]]*).*\]\]").expect("valid internal embed regex"));
static MARKDOWN_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[[^\]]*\]\((?<src>[^)]+)\)").expect("valid markdown image regex")
});

// Reserved and unreserved URI characters kept verbatim besides ASCII alphanumerics.
const URI_KEPT: &str = ";,/?:@&=+$-_.!~*'()#";
const FRONTMATTER_FENCE: &str = "---";
const FRONTMATTER_TAGS_KEY: &str = "tags";

/// Tags matched against a timeline condition.
///
/// Always includes the string entries of the timeline key. With
/// `look_for_tags_for_timeline`, inline tags (leading `#` dropped) and the
/// frontmatter `tags` field (comma-separated text or list) are added.
pub fn collect_timeline_tags(
    settings: &TimelineSettings,
    frontmatter: &Frontmatter,
    inline_tags: &[String],
) -> Vec<String> {
    let mut output: Vec<String> = frontmatter
        .get_string_list(&settings.metadata_key_event_timeline_tag)
        .unwrap_or_default()
        .into_iter()
        .map(str::to_string)
        .collect();
    if !settings.look_for_tags_for_timeline {
        return output;
    }

    output.extend(
        inline_tags
            .iter()
            .map(|tag| tag.strip_prefix('#').unwrap_or(tag).to_string()),
    );
    if let Some(text) = frontmatter.get_str(FRONTMATTER_TAGS_KEY) {
        output.extend(text.split(',').map(|tag| tag.trim().to_string()));
    } else if let Some(list) = frontmatter.get_string_list(FRONTMATTER_TAGS_KEY) {
        output.extend(list.into_iter().map(str::to_string));
    }
    output
}

/// Body shown on the event card.
///
/// The override wins when present. Otherwise the frontmatter block and
/// blockquote lines are dropped and the rest is trimmed; `None` when nothing
/// remains.
pub fn extract_body(raw_text: &str, override_body: Option<&str>) -> Option<String> {
    if let Some(body) = override_body.filter(|body| !body.is_empty()) {
        return Some(body.to_string());
    }

    let body = strip_frontmatter(raw_text)
        .filter(|line| !line.trim_start().starts_with('>'))
        .collect::<Vec<_>>()
        .join("\n");
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn strip_frontmatter(raw_text: &str) -> impl Iterator<Item = &str> {
    let lines: Vec<&str> = raw_text.lines().collect();
    let skip = match lines.first() {
        Some(first) if first.trim() == FRONTMATTER_FENCE => lines
            .iter()
            .skip(1)
            .position(|line| line.trim() == FRONTMATTER_FENCE)
            .map(|close| close + 2)
            .unwrap_or(0),
        _ => 0,
    };
    lines.into_iter().skip(skip)
}

/// First image of the note.
///
/// An override written as an internal link (`[[src]]`, `![[src|300]]`) is
/// internal; any other override is taken as an external URL or raw path.
/// Without override, the earlier of an embedded internal link and a
/// markdown image wins. External sources are percent-encoded like a URI, so
/// reserved characters survive and spaces become `%20`.
pub fn extract_image(raw_text: &str, override_image: Option<&str>) -> Option<ImageSource> {
    if let Some(value) = override_image.filter(|value| !value.trim().is_empty()) {
        let internal = INTERNAL_OVERRIDE_RE
            .captures(value)
            .and_then(|caps| caps.name("src"))
            .map(|src| src.as_str())
            .filter(|src| !src.is_empty());
        return Some(match internal {
            Some(src) => ImageSource::Internal(src.to_string()),
            None => ImageSource::External(encode_uri(value.trim())),
        });
    }

    let internal = INTERNAL_EMBED_RE.captures(raw_text);
    let external = MARKDOWN_IMAGE_RE.captures(raw_text);
    let internal_first = match (&internal, &external) {
        (Some(internal), Some(external)) => internal.get(0)?.start() < external.get(0)?.start(),
        (Some(_), None) => true,
        _ => false,
    };

    let (caps, internal) = if internal_first {
        (internal?, true)
    } else {
        (external?, false)
    };
    let src = caps.name("src")?.as_str().trim();
    if src.is_empty() {
        return None;
    }
    Some(if internal {
        ImageSource::Internal(src.to_string())
    } else {
        ImageSource::External(encode_uri(src))
    })
}

fn encode_uri(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len());
    let mut buffer = [0u8; 4];
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || URI_KEPT.contains(ch) {
            output.push(ch);
        } else {
            output.push_str(&urlencoding::encode(ch.encode_utf8(&mut buffer)));
        }
    }
    output
}

/// Reads the date stored under `key`.
///
/// Integers go through the numeric path; text is matched against the preset
/// pattern. Missing, empty or non-matching values yield `Ok(None)`.
pub fn read_date(
    frontmatter: &Frontmatter,
    key: &str,
    preset: &DatePreset,
) -> DateParseResult<Option<AbstractDate>> {
    let raw = if let Some(number) = frontmatter.get_number(key) {
        RawDateValue::Number(number)
    } else if let Some(text) = frontmatter.get_str(key) {
        RawDateValue::Text(text)
    } else {
        return Ok(None);
    };

    match preset.parse(raw) {
        Ok(date) => Ok(Some(date)),
        Err(err) if err.is_absent() => {
            debug!("event=date_absent module=extract status=skipped key={key} reason={err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Reads the end date, falling back to ongoing when the key holds a boolean.
pub fn read_end_date(
    frontmatter: &Frontmatter,
    key: &str,
    preset: &DatePreset,
) -> DateParseResult<Option<EndDate>> {
    if let Some(date) = read_date(frontmatter, key, preset)? {
        return Ok(Some(EndDate::Date(date)));
    }
    Ok(frontmatter.get_bool(key).map(|_| EndDate::Ongoing))
}
