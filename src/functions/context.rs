//! Context passed to function handlers.
//!
//! Carries the raw input, the caller's session and the shared resources.
//! Handlers are async and own their context, so it holds the resources by
//! `Arc` rather than by reference.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::session::Session;

/// The context passed to every function handler.
///
/// Generic over `R`, the shared resources the service was built with.
///
/// ## Example
///
/// ```ignore
/// pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
///     let input = ctx.input::<CreatePortfolioInput>()?;
///     let stored = ctx.backend().store.table::<Portfolio>().insert(&input.into()).await?;
///     Ok(serde_json::to_value(stored)?)
/// }
/// ```
pub struct Context<R> {
    function_name: String,
    input: Value,
    session: Session,
    backend: Arc<R>,
}

impl<R> Context<R> {
    pub(crate) fn new(function_name: String, input: Value, session: Session, backend: Arc<R>) -> Self {
        Self {
            function_name,
            input,
            session,
            backend,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(self.input.clone())
            .map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &R {
        &self.backend
    }

    /// Check that the input has `field` set to something other than null
    /// or an empty string.
    pub fn has_field(&self, field: &str) -> bool {
        match self.input.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.has_field(f))
    }
}
