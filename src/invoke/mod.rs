//! invoke: resilient calls to named remote functions.
//!
//! Every call races a per-attempt deadline, classifies failures by message
//! content, and retries transient ones with exponential backoff
//! (`retry_delay × 1.5^(attempt-1)`).
//!
//! ## Quick Start
//!
//! ```ignore
//! use product_hub::invoke::{HttpTransport, InvokeOptions, Invoker};
//! use serde_json::json;
//!
//! let invoker = Invoker::new(HttpTransport::new("https://api.example.com/functions/v1", Some(key))?);
//!
//! // Reads: 3 attempts, 1s base delay, 15s deadline
//! let portfolios = invoker.read("getPortfolios", json!({})).await?;
//!
//! // Writes: 2 attempts, 2s base delay, 30s deadline
//! invoker.write("saveProductBundle", json!({ "productId": "P1" })).await?;
//! ```

mod classify;
mod error;
mod invoker;
mod local;
mod options;
mod transport;

pub use classify::{is_retryable, RETRYABLE_KEYWORDS};
pub use error::{InvocationError, InvocationErrorKind, TransportError};
pub use invoker::{CallOutcome, Invoked, Invoker};
pub use local::LocalTransport;
pub use options::{InvokeOptions, InvokePresets, BACKOFF_FACTOR};
pub use transport::Transport;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::HttpTransport;
