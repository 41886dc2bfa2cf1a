//! Order timestamp parsing and window checks.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

/// ISO-8601 layouts that carry an explicit offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y%m%dT%H%M%S%z",
];

/// ISO-8601 layouts without an offset, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M%SZ",
];

/// Parse an order's `created_at`.
///
/// The platform format `YYYY-MM-DD HH:MM:SS` (with an optional ` UTC` suffix)
/// is tried first, then general ISO-8601: RFC 3339, offsets with or without a
/// colon, fractional seconds, minute precision, the basic `YYYYMMDDTHHMMSS`
/// layout and bare dates. Anything without an offset is UTC.
#[must_use]
pub fn parse_order_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(" UTC").unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(parsed) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(trimmed, format).ok())
    {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whether `at` falls in the trailing `window` ending at `now`, both ends inclusive.
#[must_use]
pub fn within(at: DateTime<Utc>, now: DateTime<Utc>, window: TimeDelta) -> bool {
    at <= now && at >= now - window
}
