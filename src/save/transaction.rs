use std::fmt;
use std::future::Future;

use serde_json::Value;

use super::SaveError;
use crate::store::{
    within_transaction, Store, COMMIT_TRANSACTION, ROLLBACK_TRANSACTION, START_TRANSACTION,
};

/// Which transaction call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStage {
    Begin,
    Commit,
    Rollback,
}

impl fmt::Display for TransactionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStage::Begin => write!(f, "start"),
            TransactionStage::Commit => write!(f, "commit"),
            TransactionStage::Rollback => write!(f, "roll back"),
        }
    }
}

/// An open store transaction.
///
/// Consumed by `commit` or `rollback`. Dropping it without either leaves
/// the transaction to the store (there is no async drop).
///
/// Writes belonging to the transaction run inside [`Transaction::scope`].
/// When the store names the transaction (`{ "transaction": <id> }`), the
/// scope tells it which calls are ours.
pub struct Transaction<'a, S: ?Sized> {
    store: &'a S,
    id: Option<u64>,
}

impl<'a, S: Store + ?Sized> Transaction<'a, S> {
    pub async fn begin(store: &'a S) -> Result<Self, SaveError> {
        let opened = store
            .rpc(START_TRANSACTION, Value::Null)
            .await
            .map_err(|e| SaveError::transaction(TransactionStage::Begin, e))?;
        let id = opened.get("transaction").and_then(Value::as_u64);
        tracing::debug!(transaction = ?id, "transaction started");
        Ok(Self { store, id })
    }

    /// Run `fut` as part of this transaction.
    pub async fn scope<F: Future>(&self, fut: F) -> F::Output {
        match self.id {
            Some(id) => within_transaction(id, fut).await,
            None => fut.await,
        }
    }

    pub async fn commit(self) -> Result<(), SaveError> {
        self.scope(self.store.rpc(COMMIT_TRANSACTION, Value::Null))
            .await
            .map_err(|e| SaveError::transaction(TransactionStage::Commit, e))?;
        tracing::debug!("transaction committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), SaveError> {
        self.scope(self.store.rpc(ROLLBACK_TRANSACTION, Value::Null))
            .await
            .map_err(|e| SaveError::transaction(TransactionStage::Rollback, e))?;
        tracing::debug!("transaction rolled back");
        Ok(())
    }

    /// Roll back on behalf of a failed operation. A rollback failure is
    /// logged and `cause` is returned either way.
    pub async fn abort(self, cause: SaveError) -> SaveError {
        if let Err(rollback) = self.rollback().await {
            tracing::error!(
                error = %rollback,
                cause = %cause,
                "rollback failed; reporting the original error"
            );
        }
        cause
    }
}
