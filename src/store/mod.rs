//! Store: row-level access to the relational backing store.
//!
//! The `Store` trait mirrors a hosted table API: `select/insert/update/
//! delete/upsert` on a named table, filtered by equality predicates, plus
//! `rpc` for stored procedures (the transaction primitives among them).
//! Rows are plain JSON objects keyed by snake_case column names.
//!
//! Typed access goes through [`Table`], which converts explicit record
//! types (see `crate::model`) to and from rows.
//!
//! ## Example
//!
//! ```ignore
//! use product_hub::store::{Filter, InMemoryStore, TablesExt};
//! use product_hub::model::Goal;
//!
//! let store = InMemoryStore::new();
//! store.table::<Goal>().upsert(&goal).await?;
//! let goals = store
//!     .table::<Goal>()
//!     .find(&Filter::new().eq("product_id", "P1"))
//!     .await?;
//! ```

mod in_memory;
mod table;

#[cfg(feature = "http")]
mod rest;

use std::future::Future;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use in_memory::InMemoryStore;
pub use table::{camel_to_snake, snake_to_camel, Table, TablesExt};

#[cfg(feature = "http")]
pub use rest::RestStore;

/// One row: column name → value.
pub type Row = Map<String, Value>;

/// Stored procedure opening a transaction.
pub const START_TRANSACTION: &str = "start_transaction";
/// Stored procedure committing the open transaction.
pub const COMMIT_TRANSACTION: &str = "commit_transaction";
/// Stored procedure rolling back the open transaction.
pub const ROLLBACK_TRANSACTION: &str = "rollback_transaction";

tokio::task_local! {
    static TRANSACTION: u64;
}

/// Run `fut` on behalf of transaction `id`.
///
/// Stores that hand out transaction ids from `start_transaction` use this to
/// tell the transaction's own calls apart from concurrent ones.
pub async fn within_transaction<F: Future>(id: u64, fut: F) -> F::Output {
    TRANSACTION.scope(id, fut).await
}

/// Transaction the current call runs on behalf of, if any.
pub fn current_transaction() -> Option<u64> {
    TRANSACTION.try_with(|id| *id).ok()
}

/// Conjunction of `column = value` predicates. Empty matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push((column.into(), value.into()));
        self
    }

    pub fn predicates(&self) -> &[(String, Value)] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.predicates
            .iter()
            .all(|(column, value)| row.get(column).unwrap_or(&Value::Null) == value)
    }
}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store answered with an error status.
    #[error("store error ({status}) on {target}: {message}")]
    Remote {
        target: String,
        status: u16,
        message: String,
    },
    /// The store could not be reached.
    #[error("store connection failed: {0}")]
    Connection(String),
    /// A row could not be converted to or from its record type.
    #[error("row conversion failed for {table}: {message}")]
    Conversion { table: String, message: String },
    /// A transaction procedure was called out of order.
    #[error("transaction error: {0}")]
    Transaction(String),
    /// Unknown stored procedure.
    #[error("unknown procedure: {0}")]
    UnknownProcedure(String),
    /// Internal storage failure (e.g. a poisoned lock).
    #[error("storage error: {0}")]
    Storage(String),
}

/// Row-level store API.
///
/// Object safe, so backends are shared as `Arc<dyn Store>`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Rows of `table` matching `filter`.
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError>;

    /// Insert rows, returning them as stored (with assigned ids).
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, StoreError>;

    /// Merge `patch` into every matching row, returning the updated rows.
    async fn update(&self, table: &str, filter: &Filter, patch: Row)
        -> Result<Vec<Row>, StoreError>;

    /// Delete matching rows, returning how many were removed.
    async fn delete(&self, table: &str, filter: &Filter) -> Result<usize, StoreError>;

    /// Insert `row`, or merge it into the existing row whose `on_conflict`
    /// columns are equal.
    async fn upsert(&self, table: &str, row: Row, on_conflict: &[&str])
        -> Result<Row, StoreError>;

    /// Call a stored procedure.
    async fn rpc(&self, procedure: &str, args: Value) -> Result<Value, StoreError>;
}
