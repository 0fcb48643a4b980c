//! Unified error types.
//!
//! Three layers, innermost first:
//! - [`StoreError`]: anything the table store (remote or local) can fail with.
//! - [`HistoryError`]: what the history service reports to its callers. Store
//!   failures are wrapped together with the operation that hit them so the
//!   HTTP surface can answer with a fixed, cause-free message.
//! - [`AppError`]: everything the binary (config, CLI, server) can fail with.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    // ---------------------------
    // Remote (PostgREST) store
    // ---------------------------
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid store URL: {0}")]
    Url(#[from] url::ParseError),

    // ---------------------------
    // Local (SQLite) store
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("Blocking task failed: {0}")]
    Task(String),

    // ---------------------------
    // Shared
    // ---------------------------
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Malformed row: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The history operation a store failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Add,
    DeleteAll,
    DeleteOne(i64),
    Filter,
}

impl Operation {
    /// Caller-facing message for a failure of this operation.
    pub fn failure_message(&self) -> String {
        match self {
            Operation::Fetch => "Failed to fetch history".to_string(),
            Operation::Add => "Failed to add history entry".to_string(),
            Operation::DeleteAll => "Failed to delete history".to_string(),
            Operation::DeleteOne(id) => format!("Failed to delete history entry ID {id}"),
            Operation::Filter => "Failed to filter history".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Missing fields: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("Missing entry ID")]
    MissingId,

    #[error("{}", .op.failure_message())]
    Store {
        op: Operation,
        #[source]
        source: StoreError,
    },

    /// The store accepted an insert but handed back no row.
    #[error("{}", Operation::Add.failure_message())]
    Integrity,
}

impl HistoryError {
    /// True for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HistoryError::Validation { .. } | HistoryError::MissingId
        )
    }
}

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    History(#[from] HistoryError),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration format error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Output
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Input errors
    // ---------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type AppResult<T> = Result<T, AppError>;
