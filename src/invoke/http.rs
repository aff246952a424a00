//! HTTP transport: `POST {base_url}/{function}` with a JSON body.
//!
//! Requires the `http` feature.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use super::error::TransportError;
use super::transport::Transport;
use crate::envelope::Envelope;

const CLIENT_INFO: &str = concat!("product-hub/", env!("CARGO_PKG_VERSION"));

/// Calls functions hosted behind an HTTPS gateway.
///
/// Every request carries `Content-Type: application/json`,
/// `Authorization: Bearer <key>`, `apikey: <key>` and `x-client-info`.
/// Per-attempt deadlines are enforced by the `Invoker`, not here.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: Option<&str>) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-client-info", HeaderValue::from_static(CLIENT_INFO));
        if let Some(key) = api_key {
            let bearer = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| TransportError::new(format!("invalid api key: {}", e)))?;
            let apikey = HeaderValue::from_str(key)
                .map_err(|e| TransportError::new(format!("invalid api key: {}", e)))?;
            headers.insert(AUTHORIZATION, bearer);
            headers.insert("apikey", apikey);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TransportError::new(format!("connection setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, function: &str) -> String {
        format!("{}/{}", self.base_url, function)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, function: &str, body: &Value) -> Result<Envelope, TransportError> {
        let response = self
            .client
            .post(self.url(function))
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::new(format!("Request failed: network error: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::new(format!("Request failed: connection dropped: {}", e)))?;

        // Handlers answer errors with an envelope too; only bodies that are
        // not an envelope (gateway pages, empty 5xx) become transport errors.
        match serde_json::from_str::<Envelope>(&text) {
            Ok(envelope) => Ok(envelope),
            Err(_) if status.is_success() => Err(TransportError::new(format!(
                "unexpected response from {}: not a function envelope",
                function
            ))),
            Err(_) => Err(TransportError::new(format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("HTTP error")
            ))),
        }
    }
}
