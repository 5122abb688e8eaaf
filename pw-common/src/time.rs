//! Timestamp utilities
//!
//! History records carry their timestamp as a string. Stores that serialize
//! through JSON date handling emit either ISO 8601 / RFC 3339
//! (`2024-10-01T12:00:00Z`) or the HTTP date form (`Tue, 01 Oct 2024 12:00:00 GMT`).

use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Parse a store timestamp into UTC
///
/// Accepts RFC 3339, RFC 2822 and naive ISO 8601 (interpreted as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // Naive timestamps (no offset) are stored in UTC
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Render a store timestamp in local time, falling back to the raw text
pub fn display_local(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => raw.to_string(),
    }
}
