//! Error types for remote invocation.

use std::fmt;

use thiserror::Error;

/// Failure reported by a transport before any envelope came back
/// (connection refused, TLS failure, non-JSON 5xx page, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// What went wrong on the attempt that ended the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationErrorKind {
    /// The call was rejected before the first attempt.
    Validation,
    /// The per-attempt deadline fired.
    Timeout,
    /// The transport failed.
    Transport,
    /// The remote function ran and answered `success: false`.
    Remote,
}

impl fmt::Display for InvocationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvocationErrorKind::Validation => "validation",
            InvocationErrorKind::Timeout => "timeout",
            InvocationErrorKind::Transport => "transport",
            InvocationErrorKind::Remote => "remote",
        };
        f.write_str(label)
    }
}

/// A remote call that did not produce a payload.
///
/// Displays as the underlying failure message, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvocationError {
    pub function: String,
    pub kind: InvocationErrorKind,
    /// Attempts made before giving up.
    pub attempts: u32,
    /// Whether the final failure was classified as transient.
    pub retryable: bool,
    pub message: String,
}

impl InvocationError {
    pub(crate) fn invalid(function: &str, message: impl Into<String>) -> Self {
        Self {
            function: function.to_string(),
            kind: InvocationErrorKind::Validation,
            attempts: 0,
            retryable: false,
            message: message.into(),
        }
    }
}
