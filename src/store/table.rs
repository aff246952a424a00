//! Table - typed accessor over a `Store`, and the single place where wire
//! records become rows and rows become records.

use std::marker::PhantomData;

use serde_json::Value;

use super::{Filter, Row, Store, StoreError};
use crate::model::Model;

/// `releaseNotesLink` → `release_notes_link`
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// `release_notes_link` → `releaseNotesLink`
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.push(ch.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn conversion<M: Model>(message: impl Into<String>) -> StoreError {
    StoreError::Conversion {
        table: M::TABLE.to_string(),
        message: message.into(),
    }
}

/// Wire-shaped JSON object → row with snake_case columns.
fn to_columns<M: Model>(value: Value) -> Result<Row, StoreError> {
    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| (camel_to_snake(&key), value))
            .collect()),
        other => Err(conversion::<M>(format!("expected an object, got {}", other))),
    }
}

fn to_row<M: Model>(record: &M) -> Result<Row, StoreError> {
    let value = serde_json::to_value(record).map_err(|e| conversion::<M>(e.to_string()))?;
    to_columns::<M>(value)
}

fn from_row<M: Model>(row: Row) -> Result<M, StoreError> {
    let wire: serde_json::Map<String, Value> = row
        .into_iter()
        .map(|(column, value)| (snake_to_camel(&column), value))
        .collect();
    serde_json::from_value(Value::Object(wire)).map_err(|e| conversion::<M>(e.to_string()))
}

fn from_rows<M: Model>(rows: Vec<Row>) -> Result<Vec<M>, StoreError> {
    rows.into_iter().map(from_row::<M>).collect()
}

/// Typed access to the table of `M`.
///
/// Filters name columns in row spelling (`product_id`, not `productId`).
pub struct Table<'a, S: ?Sized, M> {
    store: &'a S,
    _marker: PhantomData<M>,
}

impl<'a, S: Store + ?Sized, M: Model> Table<'a, S, M> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub async fn all(&self) -> Result<Vec<M>, StoreError> {
        self.find(&Filter::new()).await
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<M>, StoreError> {
        from_rows(self.store.select(M::TABLE, filter).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Option<M>, StoreError> {
        let rows = self
            .store
            .select(M::TABLE, &Filter::new().eq("id", id))
            .await?;
        rows.into_iter().next().map(from_row::<M>).transpose()
    }

    pub async fn insert(&self, record: &M) -> Result<M, StoreError> {
        let mut stored = self.insert_many(std::slice::from_ref(record)).await?;
        stored
            .pop()
            .ok_or_else(|| conversion::<M>("insert returned no row"))
    }

    pub async fn insert_many(&self, records: &[M]) -> Result<Vec<M>, StoreError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let rows = records.iter().map(to_row).collect::<Result<Vec<_>, _>>()?;
        from_rows(self.store.insert(M::TABLE, rows).await?)
    }

    /// Insert or merge by `M::NATURAL_KEY`.
    pub async fn upsert(&self, record: &M) -> Result<M, StoreError> {
        let row = to_row(record)?;
        from_row(self.store.upsert(M::TABLE, row, M::NATURAL_KEY).await?)
    }

    /// Merge a wire-shaped (camelCase) patch into the record with `id`.
    /// Returns `None` when no such record exists.
    pub async fn update_by_id(&self, id: &str, patch: Value) -> Result<Option<M>, StoreError> {
        let patch = to_columns::<M>(patch)?;
        let rows = self
            .store
            .update(M::TABLE, &Filter::new().eq("id", id), patch)
            .await?;
        rows.into_iter().next().map(from_row::<M>).transpose()
    }

    /// Returns whether a record was removed.
    pub async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.delete(&Filter::new().eq("id", id)).await? > 0)
    }

    pub async fn delete(&self, filter: &Filter) -> Result<usize, StoreError> {
        self.store.delete(M::TABLE, filter).await
    }
}

/// Extension trait for typed table access on any `Store`.
pub trait TablesExt: Store {
    fn table<M: Model>(&self) -> Table<'_, Self, M> {
        Table::new(self)
    }
}

impl<S: Store + ?Sized> TablesExt for S {}
