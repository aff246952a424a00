//! functions: convention-based backend function framework.
//!
//! Backend functions are registered by name on a `Service`. Each handler
//! receives a `Context<R>` with the JSON input, the caller's session and
//! the shared resources, and answers with a JSON value. The service wraps
//! every outcome in the `{success, data?, error?}` envelope.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use product_hub::functions::{self, Service, Session};
//! use serde_json::json;
//!
//! let service = Arc::new(
//!     Service::new(backend)
//!         .function("ping", |_ctx| async { Ok(json!({ "pong": true })) })
//! );
//!
//! // Direct dispatch
//! let value = service.dispatch("ping", json!({}), Session::new()).await?;
//!
//! // HTTP transport (requires "http" feature)
//! // functions::serve(service, "0.0.0.0:3000").await?;
//! ```
//!
//! ## Handler Convention
//!
//! Each function lives in its own module:
//!
//! ```ignore
//! pub mod delete_goal {
//!     pub const FUNCTION: &str = "deleteGoal";
//!
//!     pub fn guard(ctx: &Context<Backend>) -> bool {
//!         ctx.has_field("id")
//!     }
//!
//!     pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
//!         let input = ctx.input::<IdInput>()?;
//!         // ...
//!     }
//! }
//! ```

mod context;
mod error;
mod service;
mod session;

pub use context::Context;
pub use error::HandlerError;
pub use service::Service;
pub use session::Session;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{cors, router, serve, ALLOWED_HEADERS};

/// Register function modules with a service using the convention pattern.
///
/// Each module must export:
/// - `FUNCTION: &str`: the function name
/// - `guard(ctx) -> bool`: required-field check
/// - `async fn handle(ctx) -> Result<Value, HandlerError>`: the handler
///
/// # Example
/// ```ignore
/// let service = product_hub::register_handlers!(
///     Service::new(backend),
///     portfolios::get_portfolios,
///     portfolios::create_portfolio,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .function_guarded(
                $($seg)::+::FUNCTION,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
