//! InMemoryStore - HashMap-backed store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};

use super::{
    current_transaction, Filter, Row, Store, StoreError, COMMIT_TRANSACTION,
    ROLLBACK_TRANSACTION, START_TRANSACTION,
};

type Tables = HashMap<String, Vec<Row>>;

struct OpenTransaction {
    id: u64,
    /// Tables as they were when the transaction started.
    snapshot: Tables,
    /// Held until commit or rollback.
    _gate: OwnedMutexGuard<()>,
}

#[derive(Default)]
struct State {
    tables: Tables,
    open: Option<OpenTransaction>,
    next_id: u64,
}

/// In-memory store with serialized, snapshot-based transactions.
///
/// Inserts assign a UUID `id` when the row has none.
///
/// `start_transaction` waits for the transaction gate, snapshots every table
/// and answers `{ "success": true, "transaction": <id> }`. Calls made within
/// [`within_transaction`](super::within_transaction) for that id belong to
/// the transaction; every other write waits at the gate until it ends, so a
/// rollback only ever undoes the transaction's own writes. Only the owner can
/// commit or roll back. Reads never wait.
///
/// Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    gate: Arc<Mutex<()>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a transaction is currently open.
    pub fn in_transaction(&self) -> bool {
        self.read().map(|s| s.open.is_some()).unwrap_or(false)
    }

    /// Every row of `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.read()
            .map(|s| s.tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    /// Whether the caller runs on behalf of the open transaction.
    fn owns_open(&self) -> Result<bool, StoreError> {
        let state = self.read()?;
        Ok(match (&state.open, current_transaction()) {
            (Some(open), Some(id)) => open.id == id,
            _ => false,
        })
    }

    /// Wait until a write may proceed. The open transaction's own writes pass
    /// straight through; any other write holds the gate while it runs.
    async fn admit(&self) -> Result<Option<MutexGuard<'_, ()>>, StoreError> {
        if self.owns_open()? {
            return Ok(None);
        }
        Ok(Some(self.gate.lock().await))
    }

    fn with_id(mut row: Row) -> Row {
        let missing = row.get("id").map(Value::is_null).unwrap_or(true);
        if missing {
            row.insert("id".into(), Value::String(uuid::Uuid::new_v4().to_string()));
        }
        row
    }

    fn merge(target: &mut Row, patch: Row) {
        for (column, value) in patch {
            if column == "id" {
                continue;
            }
            target.insert(column, value);
        }
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError> {
        let state = self.read()?;
        Ok(state
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, StoreError> {
        let _admitted = self.admit().await?;
        let mut state = self.write()?;
        let stored: Vec<Row> = rows.into_iter().map(Self::with_id).collect();
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        patch: Row,
    ) -> Result<Vec<Row>, StoreError> {
        let _admitted = self.admit().await?;
        let mut state = self.write()?;
        let mut updated = Vec::new();
        if let Some(rows) = state.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|r| filter.matches(r)) {
                Self::merge(row, patch.clone());
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<usize, StoreError> {
        let _admitted = self.admit().await?;
        let mut state = self.write()?;
        let Some(rows) = state.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| !filter.matches(r));
        Ok(before - rows.len())
    }

    async fn upsert(
        &self,
        table: &str,
        row: Row,
        on_conflict: &[&str],
    ) -> Result<Row, StoreError> {
        let key = if on_conflict.is_empty() { &["id"][..] } else { on_conflict };
        let filter = key.iter().fold(Filter::new(), |filter, column| {
            filter.eq(*column, row.get(*column).cloned().unwrap_or(Value::Null))
        });

        let _admitted = self.admit().await?;
        let mut state = self.write()?;
        let rows = state.tables.entry(table.to_string()).or_default();
        if let Some(existing) = rows.iter_mut().find(|r| filter.matches(r)) {
            Self::merge(existing, row);
            return Ok(existing.clone());
        }

        let stored = Self::with_id(row);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn rpc(&self, procedure: &str, _args: Value) -> Result<Value, StoreError> {
        match procedure {
            START_TRANSACTION => {
                if self.owns_open()? {
                    return Err(StoreError::Transaction(
                        "a transaction is already in progress".into(),
                    ));
                }
                let gate = Arc::clone(&self.gate).lock_owned().await;
                let mut state = self.write()?;
                state.next_id += 1;
                let id = state.next_id;
                let snapshot = state.tables.clone();
                state.open = Some(OpenTransaction {
                    id,
                    snapshot,
                    _gate: gate,
                });
                Ok(json!({ "success": true, "transaction": id }))
            }
            COMMIT_TRANSACTION | ROLLBACK_TRANSACTION => {
                let mut state = self.write()?;
                let owned = match (&state.open, current_transaction()) {
                    (Some(open), Some(id)) => open.id == id,
                    _ => false,
                };
                let open = match state.open.take() {
                    Some(open) if owned => open,
                    other => {
                        state.open = other;
                        return Err(StoreError::Transaction("no transaction in progress".into()));
                    }
                };
                if procedure == ROLLBACK_TRANSACTION {
                    state.tables = open.snapshot;
                }
                Ok(json!({ "success": true }))
            }
            other => Err(StoreError::UnknownProcedure(other.to_string())),
        }
    }
}
