//! In-process transport: dispatches straight into a function `Service`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::error::TransportError;
use super::transport::Transport;
use crate::envelope::Envelope;
use crate::functions::{Service, Session};

/// Routes calls to a `Service` living in the same process, producing the
/// same envelopes the HTTP router would.
pub struct LocalTransport<R> {
    service: Arc<Service<R>>,
    session: Session,
}

impl<R: Send + Sync + 'static> LocalTransport<R> {
    pub fn new(service: Arc<Service<R>>) -> Self {
        Self {
            service,
            session: Session::new(),
        }
    }

    /// Session forwarded with every call (e.g. an authorization header).
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }
}

#[async_trait]
impl<R: Send + Sync + 'static> Transport for LocalTransport<R> {
    async fn call(&self, function: &str, body: &Value) -> Result<Envelope, TransportError> {
        let (_, envelope) = self
            .service
            .dispatch_envelope(function, body.clone(), self.session.clone())
            .await;
        Ok(envelope)
    }
}
