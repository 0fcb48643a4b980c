//! Local table store backed by a SQLite file.
//!
//! Mirrors the hosted backend closely enough to stand in for it: `LIKE` is
//! case-sensitive and descending order puts `NULL`s first, as PostgreSQL does.

use super::{Filter, Row, Select, Store, check_identifier};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{StoreError, StoreResult};
use async_trait::async_trait;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use serde_json::{Number, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<Mutex<DbPool>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and make sure the schema exists.
    pub fn open(path: &str) -> StoreResult<Self> {
        let pool = DbPool::new(path)?;
        Self::with_pool(pool)
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::with_pool(DbPool::in_memory()?)
    }

    fn with_pool(mut pool: DbPool) -> StoreResult<Self> {
        pool.with_conn(|conn| init_db(conn))?;
        Ok(Self {
            pool: Arc::new(Mutex::new(pool)),
        })
    }

    /// Run `f` against the connection on the blocking thread pool.
    async fn run<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let guard = pool.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard.conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map_or(SqlValue::Null, SqlValue::Real),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(t) | ValueRef::Blob(t) => {
            Value::String(String::from_utf8_lossy(t).into_owned())
        }
    }
}

/// Translate a `LIKE` pattern into the equivalent (case-sensitive) `GLOB` one.
fn like_to_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '%' => out.push('*'),
            '_' => out.push('?'),
            '*' | '?' | '[' => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            _ => out.push(c),
        }
    }
    out
}

fn where_clause(filter: &Filter, params: &mut Vec<SqlValue>) -> StoreResult<String> {
    let column = check_identifier(filter.column())?;
    let (op, value) = match filter {
        Filter::Eq { value, .. } => ("=", to_sql(value)),
        Filter::Neq { value, .. } => ("<>", to_sql(value)),
        Filter::Like { pattern, .. } => ("GLOB", SqlValue::Text(like_to_glob(pattern))),
    };
    params.push(value);
    Ok(format!(" WHERE \"{column}\" {op} ?{}", params.len()))
}

fn query_rows(conn: &Connection, sql: &str, params: &[SqlValue]) -> StoreResult<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let rows = stmt.query_map(params_from_iter(params.iter()), |r| {
        let mut row = Row::new();
        for (i, name) in columns.iter().enumerate() {
            row.insert(name.clone(), from_sql(r.get_ref(i)?));
        }
        Ok(row)
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[async_trait]
impl Store for SqliteStore {
    async fn select(&self, table: &str, query: &Select) -> StoreResult<Vec<Row>> {
        let mut sql = format!("SELECT * FROM \"{}\"", check_identifier(table)?);
        let mut params = Vec::new();

        if let Some(filter) = &query.filter {
            sql.push_str(&where_clause(filter, &mut params)?);
        }
        if let Some(order) = &query.order {
            let column = check_identifier(&order.column)?;
            let dir = if order.descending {
                "DESC NULLS FIRST"
            } else {
                "ASC NULLS LAST"
            };
            sql.push_str(&format!(" ORDER BY \"{column}\" {dir}"));
        }

        self.run(move |conn| query_rows(conn, &sql, &params)).await
    }

    async fn insert(&self, table: &str, row: Row) -> StoreResult<Vec<Row>> {
        let table = check_identifier(table)?;

        let sql = if row.is_empty() {
            format!("INSERT INTO \"{table}\" DEFAULT VALUES RETURNING *")
        } else {
            let mut columns = Vec::with_capacity(row.len());
            for column in row.keys() {
                columns.push(format!("\"{}\"", check_identifier(column)?));
            }
            let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{i}")).collect();
            format!(
                "INSERT INTO \"{table}\" ({}) VALUES ({}) RETURNING *",
                columns.join(", "),
                placeholders.join(", ")
            )
        };
        let params: Vec<SqlValue> = row.values().map(to_sql).collect();

        self.run(move |conn| query_rows(conn, &sql, &params)).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> StoreResult<Vec<Row>> {
        let mut params = Vec::new();
        let sql = format!(
            "DELETE FROM \"{}\"{} RETURNING *",
            check_identifier(table)?,
            where_clause(filter, &mut params)?
        );

        self.run(move |conn| query_rows(conn, &sql, &params)).await
    }
}
