//! The JSON envelope every backend function answers with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ "success": bool, "data"?: any, "error"?: string }`
///
/// Produced by the function service and consumed by the remote-call
/// transports, so both sides of a call agree on one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Error text for a failed envelope, with a stable fallback when the
    /// remote side reported failure without a message.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("Unknown error")
    }
}
