//! History record shapes.
//!
//! A stored row is a plain column map ([`crate::store::Row`]) and is never
//! rejected on read. The other forms:
//! - [`HistoryRecord`]: what the API returns (`tags` is a list).
//! - [`CreateHistoryRequest`] -> [`NewHistoryEntry`]: the create body before
//!   and after validation.

use crate::core::codec;
use crate::errors::{HistoryError, HistoryResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Wire shape of a history record.
///
/// Only `tags` has a fixed type. Every other column, `id` included, is kept
/// exactly as the store returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl HistoryRecord {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<i64> {
        self.get("id").and_then(Value::as_i64)
    }

    pub fn description(&self) -> Option<&str> {
        self.text("description")
    }

    pub fn duration(&self) -> Option<&Number> {
        match self.get("duration") {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn start_time(&self) -> Option<&str> {
        self.text("start_time")
    }

    pub fn end_time(&self) -> Option<&str> {
        self.text("end_time")
    }

    pub fn created_at(&self) -> Option<&str> {
        self.text("created_at")
    }
}

/// `tags` as sent by clients: the web page joins them itself, other callers
/// may send a plain list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    Joined(String),
    List(Vec<String>),
}

impl TagsInput {
    /// Collapse into the storage encoding (`None` when there is nothing to store).
    pub fn into_joined(self) -> Option<String> {
        match self {
            TagsInput::Joined(s) if s.is_empty() => None,
            TagsInput::Joined(s) => Some(s),
            TagsInput::List(list) => codec::join_tags(&list),
        }
    }
}

/// Body of `POST /api/history`, every field optional until validated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateHistoryRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<Number>,
    #[serde(default)]
    pub tags: Option<TagsInput>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryEntry {
    pub description: String,
    pub duration: Number,
    pub tags: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

fn present(s: &Option<String>) -> bool {
    s.as_deref().is_some_and(|v| !v.is_empty())
}

impl CreateHistoryRequest {
    /// Check required fields and build the domain entry.
    ///
    /// Every missing field is reported, in declaration order. Empty strings
    /// count as missing; `duration: 0` does not.
    pub fn validate(self) -> HistoryResult<NewHistoryEntry> {
        let mut missing = Vec::new();
        if !present(&self.description) {
            missing.push("description");
        }
        if self.duration.is_none() {
            missing.push("duration");
        }
        if !present(&self.start_time) {
            missing.push("start_time");
        }
        if !present(&self.end_time) {
            missing.push("end_time");
        }

        match (self.description, self.duration, self.start_time, self.end_time) {
            (Some(description), Some(duration), Some(start_time), Some(end_time))
                if missing.is_empty() =>
            {
                Ok(NewHistoryEntry {
                    description,
                    duration,
                    tags: self.tags.and_then(TagsInput::into_joined),
                    start_time,
                    end_time,
                })
            }
            _ => Err(HistoryError::Validation { missing }),
        }
    }
}

/// Success body of the delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

impl Acknowledgement {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
