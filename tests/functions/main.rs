//! Backend function integration tests.

mod support;
mod basic;
mod events;
