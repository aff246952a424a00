//! product_hub: backend core for a product-management tool.
//!
//! Portfolios contain products; each product tracks monthly metrics,
//! release goals, release plans, release notes and a versioned roadmap.
//!
//! - [`invoke`]: call named remote functions with a per-attempt deadline
//!   and classified, bounded retry.
//! - [`save`]: all-or-nothing saves of a product bundle, and period
//!   replace for metrics.
//! - [`functions`] + [`handlers`]: the backend functions, dispatched in
//!   process or over HTTP, answering with the [`Envelope`].
//! - [`store`], [`blob`]: the relational store and the XML artifact
//!   bucket, each with an in-memory and a hosted REST implementation.
//! - [`events`]: typed, explicitly shared event bus.

pub mod blob;
pub mod config;
pub mod envelope;
pub mod events;
pub mod functions;
pub mod handlers;
pub mod invoke;
pub mod model;
pub mod save;
pub mod store;
pub mod telemetry;

pub use envelope::Envelope;
pub use events::EventBus;
pub use handlers::Backend;
pub use invoke::{InvocationError, InvokeOptions, Invoker};
pub use save::{save_product_bundle, SaveBundle, SaveError};
