//! Formatting utilities used for CLI outputs.

use serde_json::Number;

/// Seconds as `HHh MMm SSs`; fractions are rounded to the nearest second.
pub fn secs2readable(secs: f64) -> String {
    let total = secs.abs().round() as i64;
    let sign = if secs < 0.0 && total > 0 { "-" } else { "" };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{}{:02}h {:02}m {:02}s", sign, hours, minutes, seconds)
}

/// Readable form of a stored duration, `-` when there is none.
pub fn duration_label(duration: Option<&Number>) -> String {
    duration
        .and_then(Number::as_f64)
        .map(secs2readable)
        .unwrap_or_else(|| "-".to_string())
}

/// Parse a CLI duration (seconds) keeping integers as integers.
pub fn parse_seconds(raw: &str) -> Option<Number> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Number::from(i));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}
