//! Timestamp helpers for CLI input and output.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Utc};

/// Parse an ISO-8601 / RFC 3339 timestamp.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s.trim()).ok()
}

/// Canonical storage form: UTC, millisecond precision, `Z` suffix.
pub fn to_iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Show a stored timestamp in local time; unparsable values are shown as-is.
pub fn display_local(ts: Option<&str>) -> String {
    match ts {
        None => "-".to_string(),
        Some(s) => match parse_timestamp(s) {
            Some(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            None => s.to_string(),
        },
    }
}
