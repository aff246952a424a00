//! A store that records every call and fails the ones it is told to.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use product_hub::model::{Goal, Note, Plan};
use product_hub::store::{Filter, InMemoryStore, Row, Store, StoreError};
use serde_json::Value;

/// One call as seen by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Select(String),
    Insert(String, usize),
    Update(String),
    Delete(String),
    Upsert(String, Row),
    Rpc(String),
}

/// Wraps an `InMemoryStore`, recording calls and injecting failures.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: InMemoryStore,
    calls: Mutex<Vec<Call>>,
    /// Fail upserts into `table` whose row has `column == value`.
    upsert_faults: Mutex<Vec<(String, String, Value)>>,
    /// Fail these stored procedures.
    rpc_faults: Mutex<Vec<String>>,
    /// Fail deletes from these tables.
    delete_faults: Mutex<Vec<String>>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_upsert(&self, table: &str, column: &str, value: impl Into<Value>) {
        self.upsert_faults
            .lock()
            .unwrap()
            .push((table.into(), column.into(), value.into()));
    }

    pub fn fail_rpc(&self, procedure: &str) {
        self.rpc_faults.lock().unwrap().push(procedure.into());
    }

    pub fn fail_delete(&self, table: &str) {
        self.delete_faults.lock().unwrap().push(table.into());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rpcs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Rpc(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Store for FaultyStore {
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError> {
        self.record(Call::Select(table.into()));
        self.inner.select(table, filter).await
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, StoreError> {
        self.record(Call::Insert(table.into(), rows.len()));
        self.inner.insert(table, rows).await
    }

    async fn update(&self, table: &str, filter: &Filter, patch: Row) -> Result<Vec<Row>, StoreError> {
        self.record(Call::Update(table.into()));
        self.inner.update(table, filter, patch).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<usize, StoreError> {
        self.record(Call::Delete(table.into()));
        if self.delete_faults.lock().unwrap().iter().any(|t| t == table) {
            return Err(StoreError::Remote {
                target: table.into(),
                status: 500,
                message: "delete rejected".into(),
            });
        }
        self.inner.delete(table, filter).await
    }

    async fn upsert(&self, table: &str, row: Row, on_conflict: &[&str]) -> Result<Row, StoreError> {
        self.record(Call::Upsert(table.into(), row.clone()));
        let failing = self
            .upsert_faults
            .lock()
            .unwrap()
            .iter()
            .any(|(t, column, value)| t == table && row.get(column) == Some(value));
        if failing {
            return Err(StoreError::Remote {
                target: table.into(),
                status: 409,
                message: format!("upsert rejected for {}", table),
            });
        }
        self.inner.upsert(table, row, on_conflict).await
    }

    async fn rpc(&self, procedure: &str, args: Value) -> Result<Value, StoreError> {
        self.record(Call::Rpc(procedure.into()));
        if self.rpc_faults.lock().unwrap().iter().any(|p| p == procedure) {
            return Err(StoreError::Connection(format!("{} unavailable", procedure)));
        }
        self.inner.rpc(procedure, args).await
    }
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

pub fn goal(description: &str) -> Goal {
    Goal {
        id: None,
        product_id: String::new(),
        description: description.into(),
        current_state: "now".into(),
        target_state: "later".into(),
        month: 6,
        year: 2025,
        remarks: None,
        theme_id: None,
    }
}

pub fn plan(title: &str) -> Plan {
    Plan {
        id: None,
        product_id: String::new(),
        title: title.into(),
        description: format!("{} description", title),
        category: "feature".into(),
        priority: "high".into(),
        source: "customer".into(),
        source_name: None,
        status: "planned".into(),
        owner: "sam".into(),
        month: 6,
        year: 2025,
        goal_id: None,
    }
}

pub fn note(version: &str) -> Note {
    Note {
        id: None,
        product_id: String::new(),
        release_notes_link: format!("https://notes/{}", version),
        version: version.into(),
        created_on: date(),
    }
}
