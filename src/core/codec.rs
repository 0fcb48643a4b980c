//! Conversion between storage rows and wire records.
//!
//! Tags are stored as a single comma-joined string. A tag that itself contains
//! a comma does not survive the trip: there is no escaping.

use crate::models::history::{HistoryRecord, NewHistoryEntry};
use crate::store::Row;
use serde_json::Value;

pub const TAG_SEPARATOR: char = ',';

/// Split a stored tags string. `NULL` and `""` both yield no tags.
pub fn split_tags(tags: Option<&str>) -> Vec<String> {
    match tags {
        Some(s) if !s.is_empty() => s.split(TAG_SEPARATOR).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// Join a tag list for storage. Blank entries are dropped; an empty result is `None`.
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> Option<String> {
    let kept: Vec<&str> = tags
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(","))
    }
}

/// Turn a stored row into its wire form. Never fails.
///
/// `tags` becomes a list when it is a non-empty string and `[]` for anything
/// else. `start_time` and `end_time` are always present (possibly `null`).
/// Every other column passes through untouched.
pub fn decode(mut row: Row) -> HistoryRecord {
    let tags = match row.remove("tags") {
        Some(Value::String(s)) => split_tags(Some(&s)),
        _ => Vec::new(),
    };
    for column in ["start_time", "end_time"] {
        row.entry(column).or_insert(Value::Null);
    }
    HistoryRecord { tags, fields: row }
}

pub fn decode_rows(rows: Vec<Row>) -> Vec<HistoryRecord> {
    rows.into_iter().map(decode).collect()
}

/// Build the row inserted for a validated entry.
pub fn encode(entry: &NewHistoryEntry) -> Row {
    let mut row = Row::new();
    row.insert(
        "description".into(),
        Value::String(entry.description.clone()),
    );
    row.insert("duration".into(), Value::Number(entry.duration.clone()));
    row.insert(
        "tags".into(),
        match entry.tags.as_deref() {
            Some(t) if !t.is_empty() => Value::String(t.to_string()),
            _ => Value::Null,
        },
    );
    row.insert("start_time".into(), Value::String(entry.start_time.clone()));
    row.insert("end_time".into(), Value::String(entry.end_time.clone()));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Number, json};

    fn as_row(v: Value) -> Row {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn tags_round_trip_without_commas() {
        let lists: [&[&str]; 4] = [
            &["focus"],
            &["morning", "running", "outdoor"],
            &["a b", "c-d", "ünïcode"],
            &[],
        ];
        for list in lists {
            let joined = join_tags(list);
            assert_eq!(split_tags(joined.as_deref()), list);
        }
    }

    #[test]
    fn comma_inside_a_tag_splits_it() {
        let joined = join_tags(&["a,b", "c"]);
        assert_eq!(split_tags(joined.as_deref()), vec!["a", "b", "c"]);
    }

    #[test]
    fn decode_normalizes_missing_fields() {
        let rec = decode(as_row(json!({
            "id": 7,
            "description": "write report",
            "duration": 1500,
            "tags": "",
            "created_at": "2024-01-01T10:00:00+00:00",
        })));

        assert!(rec.tags.is_empty());
        assert_eq!(rec.start_time(), None);

        let out = serde_json::to_value(&rec).unwrap();
        assert_eq!(out["start_time"], Value::Null);
        assert_eq!(out["end_time"], Value::Null);
        assert_eq!(out["tags"], json!([]));
        assert_eq!(out["duration"], json!(1500));
    }

    #[test]
    fn decode_splits_stored_tags() {
        let rec = decode(as_row(json!({
            "id": 1,
            "description": "run",
            "duration": 12.5,
            "tags": "morning,running",
            "start_time": "2024-01-01T06:00:00Z",
            "end_time": "2024-01-01T06:30:00Z",
        })));
        assert_eq!(rec.tags, vec!["morning", "running"]);
        assert_eq!(rec.duration(), Number::from_f64(12.5).as_ref());
        assert_eq!(rec.start_time(), Some("2024-01-01T06:00:00Z"));
    }

    #[test]
    fn decode_accepts_unexpected_column_types() {
        let listed = decode(as_row(json!({
            "id": 1,
            "description": "array tags",
            "duration": 60,
            "tags": ["a", "b"],
            "start_time": "2024-01-01T06:00:00Z",
            "end_time": "2024-01-01T06:01:00Z",
        })));
        assert!(listed.tags.is_empty());

        let odd = decode(as_row(json!({ "id": 2, "duration": "25", "tags": "a" })));
        assert_eq!(odd.tags, vec!["a"]);
        assert_eq!(odd.duration(), None);

        let out = serde_json::to_value(&odd).unwrap();
        assert_eq!(out["duration"], json!("25"));
        assert_eq!(out["id"], json!(2));
        assert_eq!(out["end_time"], Value::Null);
    }

    #[test]
    fn encode_writes_null_for_no_tags() {
        let entry = NewHistoryEntry {
            description: "read".into(),
            duration: Number::from(0),
            tags: None,
            start_time: "2024-01-01T00:00:00Z".into(),
            end_time: "2024-01-01T00:00:00Z".into(),
        };
        let row = encode(&entry);
        assert_eq!(row.get("tags"), Some(&Value::Null));
        assert_eq!(row.get("duration"), Some(&json!(0)));
        assert_eq!(row.len(), 5);
    }
}
