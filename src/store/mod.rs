//! Table store abstraction.
//!
//! The history service only needs three calls against a single table. Both
//! the hosted PostgREST backend and the local SQLite file implement them with
//! the same filter and ordering semantics.

pub mod postgrest;
pub mod sqlite;

use crate::config::{Backend, Config};
use crate::errors::{AppResult, StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fs;
use std::sync::Arc;
use tracing::info;

pub use postgrest::PostgrestStore;
pub use sqlite::SqliteStore;

/// A row as exchanged with a store: column name -> JSON value.
pub type Row = Map<String, Value>;

/// Row filter. `Like` uses SQL `LIKE` wildcards (`%`, `_`) and is case-sensitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { column: String, value: Value },
    Neq { column: String, value: Value },
    Like { column: String, pattern: String },
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Eq {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn neq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Neq {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn like(column: &str, pattern: impl Into<String>) -> Self {
        Filter::Like {
            column: column.to_string(),
            pattern: pattern.into(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq { column, .. } | Filter::Neq { column, .. } | Filter::Like { column, .. } => {
                column
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

impl Order {
    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            descending: true,
        }
    }
}

/// Parameters of a `select`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    pub filter: Option<Filter>,
    pub order: Option<Order>,
}

impl Select {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Rows of `table` matching the query.
    async fn select(&self, table: &str, query: &Select) -> StoreResult<Vec<Row>>;

    /// Insert one row; returns the row(s) as stored.
    async fn insert(&self, table: &str, row: Row) -> StoreResult<Vec<Row>>;

    /// Delete matching rows; returns what was removed (may be empty).
    async fn delete(&self, table: &str, filter: &Filter) -> StoreResult<Vec<Row>>;
}

/// Open the store selected by `cfg.backend`.
pub fn open_store(cfg: &Config) -> AppResult<Arc<dyn Store>> {
    match cfg.backend {
        Backend::Remote => {
            let (url, key) = cfg.remote_credentials()?;
            let store = PostgrestStore::new(url, key, cfg.request_timeout())?;
            info!(url = %store.rest_base(), "using hosted history table");
            Ok(Arc::new(store))
        }
        Backend::Sqlite => {
            let path = cfg.database_path();
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            info!(path = %path.display(), "using local history database");
            Ok(Arc::new(SqliteStore::open(&path.to_string_lossy())?))
        }
    }
}

/// Table and column names end up inside URLs and SQL text.
pub(crate) fn check_identifier(name: &str) -> StoreResult<&str> {
    let valid = !name.is_empty()
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(name)
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}
