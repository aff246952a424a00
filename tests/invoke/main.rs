//! Resilient invocation integration tests.

mod support;
mod retry;
