//! RestStore - the hosted relational store over its REST API (PostgREST
//! conventions). Requires the `http` feature.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

use super::{Filter, Row, Store, StoreError};

/// Store backed by `{url}/rest/v1`.
///
/// - `select`  → `GET /{table}?col=eq.value`
/// - `insert`  → `POST /{table}`
/// - `update`  → `PATCH /{table}?col=eq.value`
/// - `delete`  → `DELETE /{table}?col=eq.value`
/// - `upsert`  → `POST /{table}?on_conflict=a,b` with merge-duplicates
/// - `rpc`     → `POST /rpc/{procedure}`
#[derive(Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
}

impl RestStore {
    pub fn new(url: &str, api_key: &str) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| StoreError::Connection(format!("invalid api key: {}", e)))?;
        let apikey = HeaderValue::from_str(api_key)
            .map_err(|e| StoreError::Connection(format!("invalid api key: {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("apikey", apikey);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("{}/rest/v1", url.trim_end_matches('/')),
        })
    }

    fn request(&self, method: Method, path: &str, filter: &Filter) -> RequestBuilder {
        let query: Vec<(String, String)> = filter
            .predicates()
            .iter()
            .map(|(column, value)| (column.clone(), format!("eq.{}", literal(value))))
            .collect();
        self.client
            .request(method, format!("{}/{}", self.base_url, path))
            .query(&query)
    }

    async fn send(&self, target: &str, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Remote {
            target: target.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(&self, target: &str, response: Response) -> Result<Vec<Row>, StoreError> {
        response.json::<Vec<Row>>().await.map_err(|e| StoreError::Remote {
            target: target.to_string(),
            status: 200,
            message: format!("malformed rows: {}", e),
        })
    }
}

/// Query-string literal for an equality predicate.
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Store for RestStore {
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError> {
        let request = self
            .request(Method::GET, table, filter)
            .query(&[("select", "*")]);
        let response = self.send(table, request).await?;
        self.rows(table, response).await
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, StoreError> {
        let request = self
            .request(Method::POST, table, &Filter::new())
            .header("Prefer", "return=representation")
            .json(&rows);
        let response = self.send(table, request).await?;
        self.rows(table, response).await
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        patch: Row,
    ) -> Result<Vec<Row>, StoreError> {
        let request = self
            .request(Method::PATCH, table, filter)
            .header("Prefer", "return=representation")
            .json(&patch);
        let response = self.send(table, request).await?;
        self.rows(table, response).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<usize, StoreError> {
        let request = self
            .request(Method::DELETE, table, filter)
            .header("Prefer", "return=representation");
        let response = self.send(table, request).await?;
        Ok(self.rows(table, response).await?.len())
    }

    async fn upsert(
        &self,
        table: &str,
        row: Row,
        on_conflict: &[&str],
    ) -> Result<Row, StoreError> {
        let mut request = self
            .request(Method::POST, table, &Filter::new())
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&vec![row]);
        if !on_conflict.is_empty() {
            request = request.query(&[("on_conflict", on_conflict.join(","))]);
        }
        let response = self.send(table, request).await?;
        self.rows(table, response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Remote {
                target: table.to_string(),
                status: 200,
                message: "upsert returned no row".into(),
            })
    }

    async fn rpc(&self, procedure: &str, args: Value) -> Result<Value, StoreError> {
        let body = if args.is_null() { Value::Object(Row::new()) } else { args };
        let request = self
            .request(Method::POST, &format!("rpc/{}", procedure), &Filter::new())
            .json(&body);
        let response = self.send(procedure, request).await?;
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Remote {
            target: procedure.to_string(),
            status: 200,
            message: format!("malformed procedure result: {}", e),
        })
    }
}
