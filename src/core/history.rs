//! History service: validation, codec and one store round-trip per operation.

use crate::core::codec;
use crate::errors::{HistoryError, HistoryResult, Operation, StoreError};
use crate::models::history::{Acknowledgement, CreateHistoryRequest, HistoryRecord};
use crate::store::{Filter, Order, Select, Store};
use std::sync::Arc;
use tracing::{error, info};

pub const DEFAULT_TABLE: &str = "history";

/// No row ever has this id; deleting `id <> -1` clears the table.
const IMPOSSIBLE_ID: i64 = -1;

/// Log the cause, keep only the operation for the caller.
fn store_failure(op: Operation) -> impl FnOnce(StoreError) -> HistoryError {
    move |source| {
        error!(error = %source, "{}", op.failure_message());
        HistoryError::Store { op, source }
    }
}

#[derive(Clone)]
pub struct HistoryService {
    store: Arc<dyn Store>,
    table: String,
}

impl HistoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_table(store, DEFAULT_TABLE)
    }

    pub fn with_table(store: Arc<dyn Store>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn newest_first() -> Select {
        Select::all().order(Order::desc("start_time"))
    }

    async fn fetch(&self, query: Select, op: Operation) -> HistoryResult<Vec<HistoryRecord>> {
        let rows = self
            .store
            .select(&self.table, &query)
            .await
            .map_err(store_failure(op))?;
        Ok(codec::decode_rows(rows))
    }

    /// Every record, newest `start_time` first.
    pub async fn list(&self) -> HistoryResult<Vec<HistoryRecord>> {
        self.fetch(Self::newest_first(), Operation::Fetch).await
    }

    /// Records whose stored tags contain `tag` as a substring.
    ///
    /// Matching is on the joined string, so `run` also hits `running` and
    /// may straddle two tags. No tag (or an empty one) lists everything.
    pub async fn filter(&self, tag: Option<&str>) -> HistoryResult<Vec<HistoryRecord>> {
        let mut query = Self::newest_first();
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            query = query.filter(Filter::like("tags", format!("%{tag}%")));
        }
        self.fetch(query, Operation::Filter).await
    }

    pub async fn create(&self, request: CreateHistoryRequest) -> HistoryResult<HistoryRecord> {
        let entry = request.validate()?;
        let row = codec::encode(&entry);

        let op = Operation::Add;
        let mut inserted = self.store.insert(&self.table, row).await.map_err(store_failure(op))?;

        if inserted.is_empty() {
            error!("insert into {} returned no data", self.table);
            return Err(HistoryError::Integrity);
        }

        let record = codec::decode(inserted.swap_remove(0));
        info!(id = ?record.id(), "history entry added");
        Ok(record)
    }

    pub async fn delete_all(&self) -> HistoryResult<Acknowledgement> {
        let op = Operation::DeleteAll;
        let removed = self
            .store
            .delete(&self.table, &Filter::neq("id", IMPOSSIBLE_ID))
            .await
            .map_err(store_failure(op))?;

        info!(rows = removed.len(), "history cleared");
        Ok(Acknowledgement::new("Successfully deleted history entries."))
    }

    /// Delete one record. Succeeds whether or not the id existed.
    pub async fn delete_one(&self, id: i64) -> HistoryResult<Acknowledgement> {
        if id == 0 {
            return Err(HistoryError::MissingId);
        }

        let op = Operation::DeleteOne(id);
        let removed = self
            .store
            .delete(&self.table, &Filter::eq("id", id))
            .await
            .map_err(store_failure(op))?;

        info!(id, rows = removed.len(), "history entry delete attempted");
        Ok(Acknowledgement::new(format!(
            "Attempted deletion for entry ID {id}."
        )))
    }
}
