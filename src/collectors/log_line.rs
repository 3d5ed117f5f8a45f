//! Parsing helpers shared by the log sources.

use chrono::{DateTime, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::LogEntry;
use crate::security::scrub_message;

lazy_static! {
    static ref LEVEL: Regex = Regex::new(
        r"(?i)\b(TRACE|DEBUG|INFO|WARN|WARNING|ERROR|FATAL|CRITICAL)\b"
    ).unwrap();

    /// Leading timestamp: RFC 3339 / ISO 8601 or `YYYY-MM-DD HH:MM:SS[.fff]`
    static ref LEADING_TIMESTAMP: Regex = Regex::new(
        r"^\[?(\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?(?:Z|[+-]\d{2}:?\d{2})?)"
    ).unwrap();
}

/// Detect a severity keyword, normalised to upper case.
pub fn detect_level(line: &str) -> Option<String> {
    LEVEL.captures(line).map(|caps| {
        match caps[1].to_uppercase().as_str() {
            "WARNING" => "WARN".to_string(),
            "CRITICAL" => "FATAL".to_string(),
            other => other.to_string(),
        }
    })
}

/// Parse a timestamp at the start of a line. Naive times are taken as UTC.
pub fn parse_leading_timestamp(line: &str) -> Option<DateTime<Utc>> {
    let raw = LEADING_TIMESTAMP.captures(line)?.get(1)?.as_str().replace(',', ".");

    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // journald short-iso uses a colon-less offset: 2024-01-15T10:00:00+0000
    if let Ok(ts) = DateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Scrub a raw line and build an entry from it.
///
/// Returns `None` for blank lines. Level and timestamp are derived from
/// the raw line, then the raw text is dropped.
pub fn scrubbed_entry(source: &str, raw: &str, fallback: DateTime<Utc>) -> Option<LogEntry> {
    let trimmed = raw.trim_end_matches(['\r', '\n']);
    if trimmed.trim().is_empty() {
        return None;
    }
    Some(LogEntry {
        source: source.to_string(),
        timestamp: parse_leading_timestamp(trimmed).unwrap_or(fallback),
        level: detect_level(trimmed),
        text: scrub_message(trimmed),
    })
}
