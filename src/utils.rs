use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::path::PathBuf;

use crate::collect::StopPolicy;

/// Configuration required to run an export.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone)]
pub struct RunConfig {
    pub boundary: NaiveDate,
    pub endpoint: String,
    pub topics: Vec<String>,
    pub output: PathBuf,
    pub stop_policy: StopPolicy,
    pub verbose: bool,
    pub quiet: bool,
}

/// Parse an upstream ISO-8601 timestamp, keeping the clock time as written
/// (no timezone conversion — the display format has day granularity anyway).
fn parse_iso(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Reformat an ISO-8601 timestamp as e.g. "May 02, 2025".
/// Anything that does not parse passes through verbatim.
pub fn format_display_date(raw: &str) -> String {
    match parse_iso(raw) {
        Some(dt) => dt.format("%b %d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// The calendar date a conversation was assigned on, if the timestamp parses.
pub fn assigned_date(raw: &str) -> Option<NaiveDate> {
    parse_iso(raw).map(|dt| dt.date())
}

/// Join note values with a blank line between them.
/// Only a non-empty array of note objects produces output; every other shape
/// (null, empty array, non-object entries) degrades to an empty string.
pub fn join_notes(raw: &Value) -> String {
    let Some(entries) = raw.as_array() else {
        return String::new();
    };
    if entries.is_empty() || entries.iter().any(|e| !e.is_object()) {
        return String::new();
    }
    entries
        .iter()
        .map(|e| e.get("value").and_then(Value::as_str).unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n\n")
}
