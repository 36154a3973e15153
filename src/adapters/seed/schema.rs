//! Raw seed file schemas and day-label parsing.
//!
//! Seed files are authored YAML; the structs here mirror their shape
//! exactly, before any validation or kind resolution happens. Building
//! domain values out of raw rows lives with each store.

use serde::Deserialize;

/// Top-level shape of `templates.yaml`.
#[derive(Debug, Deserialize)]
pub(super) struct TemplateSeedFile {
    pub templates: Vec<RawTemplate>,
}

/// One treatment template as authored.
#[derive(Debug, Deserialize)]
pub(super) struct RawTemplate {
    pub treatment_type: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub total_duration_days: i32,
    #[serde(default)]
    pub stages: Vec<RawTemplateStage>,
}

/// One template stage as authored.
#[derive(Debug, Deserialize)]
pub(super) struct RawTemplateStage {
    pub name: String,
    pub day: String,
    #[serde(default)]
    pub medical_details: Option<String>,
    #[serde(default)]
    pub monitoring_procedures: Option<String>,
    #[serde(default)]
    pub patient_insights: Option<String>,
}

/// Top-level shape of `stage_reference.yaml`.
#[derive(Debug, Deserialize)]
pub(super) struct StageSeedFile {
    pub rows: Vec<RawStageRow>,
}

/// One stage reference row as authored.
#[derive(Debug, Deserialize)]
pub(super) struct RawStageRow {
    pub stage_id: String,
    pub treatment_type: String,
    pub stage_name: String,
    pub start_milestone: String,
    #[serde(default)]
    pub end_milestone: Option<String>,
    pub days: String,
    #[serde(default = "default_ui_priority")]
    pub ui_priority: u32,
    #[serde(default)]
    pub details: String,
}

fn default_ui_priority() -> u32 {
    5
}

/// Top-level shape of `content_blocks.yaml`.
#[derive(Debug, Deserialize)]
pub(super) struct ContentSeedFile {
    pub blocks: Vec<RawContentBlock>,
}

/// One content block as authored.
#[derive(Debug, Deserialize)]
pub(super) struct RawContentBlock {
    pub id: String,
    pub treatment_type: String,
    pub milestone_name: String,
    #[serde(default)]
    pub notification_title: Option<String>,
    #[serde(default)]
    pub medical_information: Option<String>,
    #[serde(default)]
    pub what_to_expect: Option<String>,
    #[serde(default)]
    pub todays_tips: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub day_offset: Option<i32>,
}

/// Parses an authored day label into a `(start, end)` day pair.
///
/// Accepted shapes, all with an optional case-insensitive `Day`/`Days`
/// prefix: a single day (`"Day 13"`, `"-14"`), a hyphen range between
/// non-negative days (`"Day 10-12"`), and a `to` range that keeps signs
/// intact (`"-14 to -7"`, `"Day 8 to 11"`).
pub(super) fn parse_day_label(label: &str) -> Result<(i32, Option<i32>), String> {
    let mut rest = label.trim();
    for prefix in ["days", "day"] {
        if let Some(head) = rest.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                rest = rest[prefix.len()..].trim_start();
                break;
            }
        }
    }
    if rest.is_empty() {
        return Err(format!("empty day label '{}'", label));
    }

    if let Some((lhs, rhs)) = rest.split_once(" to ") {
        let start = parse_day_number(lhs)?;
        let end = parse_day_number(rhs)?;
        return Ok((start, Some(end)));
    }

    // A leading '-' is a sign; any later '-' splits a range.
    let range_split = rest
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '-')
        .map(|(i, _)| i);
    if let Some(idx) = range_split {
        let (lhs, rhs) = rest.split_at(idx);
        let start = parse_day_number(lhs)?;
        let end = parse_day_number(&rhs[1..])?;
        return Ok((start, Some(end)));
    }

    Ok((parse_day_number(rest)?, None))
}

fn parse_day_number(raw: &str) -> Result<i32, String> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| format!("unparseable day number '{}'", raw.trim()))
}
