//! Atomic multi-entity save integration tests.

mod support;
mod atomicity;
mod concurrency;
