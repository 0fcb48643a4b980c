//! Hosted table store spoken over the PostgREST protocol (Supabase `rest/v1`).

use super::{Filter, Row, Select, Store, check_identifier};
use crate::errors::{StoreError, StoreResult};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const REST_PATH: &str = "rest/v1/";

#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: Client,
    rest_base: Url,
}

impl PostgrestStore {
    /// `project_url` is the project root (e.g. `https://xyz.supabase.co`);
    /// `api_key` is sent both as `apikey` and as bearer token.
    pub fn new(project_url: &str, api_key: &str, timeout: Duration) -> StoreResult<Self> {
        let mut base = Url::parse(project_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest_base = base.join(REST_PATH)?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| StoreError::InvalidIdentifier("api key".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| StoreError::InvalidIdentifier("api key".into()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, rest_base })
    }

    pub fn rest_base(&self) -> &Url {
        &self.rest_base
    }

    fn table_url(&self, table: &str) -> StoreResult<Url> {
        Ok(self.rest_base.join(check_identifier(table)?)?)
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Row>) -> StoreResult<Vec<Row>> {
        debug!(%method, %url, "store request");

        let mut req = self
            .client
            .request(method, url)
            .header("Prefer", "return=representation");
        if let Some(row) = body {
            req = req.json(row);
        }

        read_rows(req.send().await?).await
    }
}

async fn read_rows(resp: Response) -> StoreResult<Vec<Row>> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    // A single object comes back when the request asked for one.
    match serde_json::from_str::<Value>(&text)? {
        Value::Array(items) => items
            .into_iter()
            .map(|v| match v {
                Value::Object(row) => Ok(row),
                other => Err(serde::de::Error::custom(format!("expected object row, got {other}"))),
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()
            .map_err(StoreError::from),
        Value::Object(row) => Ok(vec![row]),
        other => Err(StoreError::Decode(serde::de::Error::custom(format!(
            "expected rows, got {other}"
        )))),
    }
}

/// Render a filter value the way PostgREST expects it in a query string.
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_filter(url: &mut Url, filter: &Filter) -> StoreResult<()> {
    let column = check_identifier(filter.column())?;
    let expr = match filter {
        Filter::Eq { value, .. } => format!("eq.{}", literal(value)),
        Filter::Neq { value, .. } => format!("neq.{}", literal(value)),
        Filter::Like { pattern, .. } => format!("like.{pattern}"),
    };
    url.query_pairs_mut().append_pair(column, &expr);
    Ok(())
}

#[async_trait]
impl Store for PostgrestStore {
    async fn select(&self, table: &str, query: &Select) -> StoreResult<Vec<Row>> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("select", "*");
        if let Some(filter) = &query.filter {
            push_filter(&mut url, filter)?;
        }
        if let Some(order) = &query.order {
            let dir = if order.descending { "desc" } else { "asc" };
            let expr = format!("{}.{dir}", check_identifier(&order.column)?);
            url.query_pairs_mut().append_pair("order", &expr);
        }
        self.send(Method::GET, url, None).await
    }

    async fn insert(&self, table: &str, row: Row) -> StoreResult<Vec<Row>> {
        for column in row.keys() {
            check_identifier(column)?;
        }
        let url = self.table_url(table)?;
        self.send(Method::POST, url, Some(&row)).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> StoreResult<Vec<Row>> {
        let mut url = self.table_url(table)?;
        push_filter(&mut url, filter)?;
        self.send(Method::DELETE, url, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(url: &str) -> PostgrestStore {
        PostgrestStore::new(url, "anon-key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn rest_base_handles_trailing_slash() {
        assert_eq!(
            store("https://abc.supabase.co").rest_base().as_str(),
            "https://abc.supabase.co/rest/v1/"
        );
        assert_eq!(
            store("http://localhost:54321/").rest_base().as_str(),
            "http://localhost:54321/rest/v1/"
        );
        assert_eq!(
            store("http://gateway/tenant").rest_base().as_str(),
            "http://gateway/tenant/rest/v1/"
        );
    }

    #[test]
    fn filters_render_as_operators() {
        let mut url = Url::parse("http://h/rest/v1/history").unwrap();
        push_filter(&mut url, &Filter::neq("id", -1)).unwrap();
        push_filter(&mut url, &Filter::like("tags", "%run%")).unwrap();
        push_filter(&mut url, &Filter::eq("description", json!("a b"))).unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("id".to_string(), "neq.-1".to_string()),
                ("tags".to_string(), "like.%run%".to_string()),
                ("description".to_string(), "eq.a b".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_bad_table_names() {
        let s = store("http://localhost");
        assert!(matches!(
            s.table_url("../auth"),
            Err(StoreError::InvalidIdentifier(_))
        ));
    }
}
