//! Service: function registry and dispatch.
//!
//! `Service<R>` holds shared resources and a set of named async function
//! handlers. Each handler receives an owned `Context<R>` and returns
//! `Result<Value, HandlerError>`.
//!
//! ## Example
//!
//! ```ignore
//! use product_hub::functions::{Service, Session};
//! use serde_json::json;
//!
//! let service = Service::new(backend)
//!     .function("ping", |_ctx| async { Ok(json!({ "pong": true })) });
//!
//! let (status, envelope) = service
//!     .dispatch_envelope("ping", json!({}), Session::new())
//!     .await;
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use super::context::Context;
use super::error::HandlerError;
use super::session::Session;
use crate::envelope::Envelope;

type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, HandlerError>> + Send>>;

/// A registered function handler with optional guard.
struct FunctionHandler<R> {
    guard: Option<Box<dyn Fn(&Context<R>) -> bool + Send + Sync>>,
    handle: Box<dyn Fn(Context<R>) -> HandlerFuture + Send + Sync>,
}

/// Routes named functions to their handlers.
///
/// Generic over `R`, the resources type. Handlers reach it through
/// `ctx.backend()`.
pub struct Service<R> {
    backend: Arc<R>,
    handlers: HashMap<String, FunctionHandler<R>>,
}

impl<R: Send + Sync + 'static> Service<R> {
    pub fn new(backend: R) -> Self {
        Self {
            backend: Arc::new(backend),
            handlers: HashMap::new(),
        }
    }

    /// Register a function handler. Returns `self` for chaining.
    pub fn function<F, Fut>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(Context<R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            FunctionHandler {
                guard: None,
                handle: Box::new(move |ctx| Box::pin(handler(ctx))),
            },
        );
        self
    }

    /// Register a function handler with a guard.
    ///
    /// The guard runs before the handler. If it returns `false` the call is
    /// rejected with `HandlerError::GuardRejected` and the handler never runs.
    pub fn function_guarded<G, F, Fut>(mut self, name: &str, guard: G, handler: F) -> Self
    where
        G: Fn(&Context<R>) -> bool + Send + Sync + 'static,
        F: Fn(Context<R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            FunctionHandler {
                guard: Some(Box::new(guard)),
                handle: Box::new(move |ctx| Box::pin(handler(ctx))),
            },
        );
        self
    }

    /// Dispatch a function by name.
    pub async fn dispatch(
        &self,
        function: &str,
        input: Value,
        session: Session,
    ) -> Result<Value, HandlerError> {
        let handler = self
            .handlers
            .get(function)
            .ok_or_else(|| HandlerError::UnknownFunction(function.to_string()))?;

        let ctx = Context::new(
            function.to_string(),
            input,
            session,
            Arc::clone(&self.backend),
        );

        if let Some(guard) = &handler.guard {
            if !guard(&ctx) {
                return Err(HandlerError::GuardRejected(function.to_string()));
            }
        }

        (handler.handle)(ctx).await
    }

    /// Dispatch and wrap the outcome in an envelope, with the HTTP status
    /// the outcome maps to.
    pub async fn dispatch_envelope(
        &self,
        function: &str,
        input: Value,
        session: Session,
    ) -> (u16, Envelope) {
        match self.dispatch(function, input, session).await {
            Ok(data) => (200, Envelope::ok(data)),
            Err(err) => {
                let status = err.status_code();
                if status >= 500 {
                    tracing::error!(function, status, error = %err, "function failed");
                } else {
                    tracing::warn!(function, status, error = %err, "function rejected");
                }
                (status, Envelope::err(err.to_string()))
            }
        }
    }

    /// Registered function names, sorted.
    pub fn functions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn backend(&self) -> &R {
        &self.backend
    }
}
