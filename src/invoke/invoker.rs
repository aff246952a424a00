//! Invoker: timeout plus classified, bounded retry around a transport.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::classify::is_retryable;
use super::error::{InvocationError, InvocationErrorKind};
use super::options::{InvokeOptions, InvokePresets};
use super::transport::Transport;

/// Result of a single attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Success { payload: Value },
    Failure {
        reason: String,
        retryable: bool,
        kind: InvocationErrorKind,
    },
}

/// A successful call together with the number of attempts it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoked {
    pub payload: Value,
    pub attempts: u32,
}

/// Calls remote functions through a `Transport`, racing every attempt
/// against a deadline and retrying transient failures with exponential
/// backoff.
///
/// ## Example
///
/// ```ignore
/// let invoker = Invoker::new(HttpTransport::new(base_url, api_key)?);
/// let portfolios = invoker
///     .invoke("getPortfolios", json!({}), InvokeOptions::read())
///     .await?;
/// ```
pub struct Invoker<T> {
    transport: T,
    presets: InvokePresets,
}

impl<T: Transport> Invoker<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            presets: InvokePresets::default(),
        }
    }

    /// Replace the policies used by `read` and `write`.
    pub fn with_presets(mut self, presets: InvokePresets) -> Self {
        self.presets = presets;
        self
    }

    pub fn presets(&self) -> &InvokePresets {
        &self.presets
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Invoke `function` and return its payload.
    pub async fn invoke(
        &self,
        function: &str,
        parameters: Value,
        options: InvokeOptions,
    ) -> Result<Value, InvocationError> {
        self.call(function, parameters, options)
            .await
            .map(|invoked| invoked.payload)
    }

    /// Invoke and deserialize the payload into `R`.
    pub async fn invoke_as<R: DeserializeOwned>(
        &self,
        function: &str,
        parameters: Value,
        options: InvokeOptions,
    ) -> Result<R, InvocationError> {
        let invoked = self.call(function, parameters, options).await?;
        serde_json::from_value(invoked.payload).map_err(|e| InvocationError {
            function: function.to_string(),
            kind: InvocationErrorKind::Remote,
            attempts: invoked.attempts,
            retryable: false,
            message: format!("unexpected payload from {}: {}", function, e),
        })
    }

    /// Invoke with the read preset.
    pub async fn read(&self, function: &str, parameters: Value) -> Result<Value, InvocationError> {
        self.invoke(function, parameters, self.presets.read).await
    }

    /// Invoke with the write preset (also used for deletes).
    pub async fn write(&self, function: &str, parameters: Value) -> Result<Value, InvocationError> {
        self.invoke(function, parameters, self.presets.write).await
    }

    /// Invoke `function`, reporting how many attempts it took.
    ///
    /// At most `options.attempts()` attempts are made. A failure that does
    /// not classify as retryable ends the call immediately, whatever budget
    /// is left. An attempt that loses the race against its deadline is
    /// dropped locally; the remote side may still complete it.
    pub async fn call(
        &self,
        function: &str,
        parameters: Value,
        options: InvokeOptions,
    ) -> Result<Invoked, InvocationError> {
        if function.trim().is_empty() {
            return Err(InvocationError::invalid(function, "function name is required"));
        }

        let attempts = options.attempts();
        let mut attempt = 1;
        loop {
            tracing::debug!(function, attempt, max_attempts = attempts, "invoking remote function");

            let (reason, retryable, kind) = match self.attempt(function, &parameters, &options).await {
                CallOutcome::Success { payload } => {
                    tracing::debug!(function, attempt, "remote function succeeded");
                    return Ok(Invoked {
                        payload,
                        attempts: attempt,
                    });
                }
                CallOutcome::Failure {
                    reason,
                    retryable,
                    kind,
                } => (reason, retryable, kind),
            };

            if !retryable || attempt >= attempts {
                tracing::error!(
                    function,
                    attempt,
                    retryable,
                    kind = %kind,
                    error = %reason,
                    "remote function failed"
                );
                return Err(InvocationError {
                    function: function.to_string(),
                    kind,
                    attempts: attempt,
                    retryable,
                    message: reason,
                });
            }

            let delay = options.backoff(attempt);
            tracing::warn!(
                function,
                attempt,
                kind = %kind,
                error = %reason,
                delay_ms = delay.as_millis() as u64,
                "retryable failure, backing off"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// One attempt: race the transport against the deadline and classify
    /// whatever failure comes back.
    async fn attempt(
        &self,
        function: &str,
        parameters: &Value,
        options: &InvokeOptions,
    ) -> CallOutcome {
        let call = self.transport.call(function, parameters);
        let result = match options.timeout() {
            Some(deadline) => match tokio::time::timeout(deadline, call).await {
                Ok(result) => result,
                Err(_) => {
                    return CallOutcome::failure(
                        format!("Request timeout after {}ms", options.timeout_ms),
                        InvocationErrorKind::Timeout,
                    )
                }
            },
            None => call.await,
        };

        match result {
            Ok(envelope) if envelope.success => CallOutcome::Success {
                payload: envelope.data.unwrap_or(Value::Null),
            },
            Ok(envelope) => CallOutcome::failure(
                envelope.error_message().to_string(),
                InvocationErrorKind::Remote,
            ),
            Err(e) => CallOutcome::failure(e.to_string(), InvocationErrorKind::Transport),
        }
    }
}

impl CallOutcome {
    fn failure(reason: String, kind: InvocationErrorKind) -> Self {
        CallOutcome::Failure {
            retryable: is_retryable(&reason),
            reason,
            kind,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success { .. })
    }
}
