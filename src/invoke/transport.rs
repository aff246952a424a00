//! Transport abstraction for remote function calls.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::error::TransportError;
use crate::envelope::Envelope;

/// Carries one call to a named remote function and returns its envelope.
///
/// Implementations:
/// - `HttpTransport` - HTTPS `POST {base}/{function}` (requires `http`)
/// - `LocalTransport` - in-process dispatch to a function `Service`
///
/// A transport makes exactly one attempt; timeouts and retries belong to
/// the `Invoker`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, function: &str, body: &Value) -> Result<Envelope, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn call(&self, function: &str, body: &Value) -> Result<Envelope, TransportError> {
        (**self).call(function, body).await
    }
}
