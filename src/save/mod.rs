//! Atomic multi-entity save.
//!
//! A [`SaveBundle`] carries several sub-collections of records for one
//! product. [`save_product_bundle`] writes every populated sub-collection
//! inside one store transaction: either all of them are committed or the
//! transaction is rolled back.
//!
//! ```ignore
//! let bundle = SaveBundle::new("P1").with_goals(goals).with_plans(plans);
//! save_product_bundle(&store, &bundle).await?;
//! ```
//!
//! Sub-collections are processed in a fixed order: goals, plans, notes,
//! roadmap, roadmap details. Records within one sub-collection are written
//! concurrently; every sub-collection is attempted before the outcome is
//! decided. When several writes fail, the first failure by that order (and
//! by record order within a sub-collection) is reported.
//!
//! Metrics are not part of a bundle; they are saved per period with
//! [`replace_period`].

mod period;
mod transaction;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Goal, Note, Period, Plan, ProductScoped, RoadmapDetail, RoadmapEntry};
use crate::store::{Store, StoreError, TablesExt};

pub use period::{replace_period, PeriodReplaced};
pub use transaction::{Transaction, TransactionStage};

/// Error type for save operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    /// Required input was missing or malformed. Nothing was sent to the store.
    #[error("{0}")]
    Validation(String),
    /// A transaction primitive failed.
    #[error("failed to {stage} transaction: {message}")]
    Transaction {
        stage: TransactionStage,
        message: String,
    },
    /// A record of `collection` could not be written.
    #[error("failed to save {collection}: {message}")]
    Write {
        collection: &'static str,
        message: String,
    },
}

impl SaveError {
    pub(crate) fn transaction(stage: TransactionStage, err: StoreError) -> Self {
        SaveError::Transaction {
            stage,
            message: err.to_string(),
        }
    }

    pub(crate) fn write(collection: &'static str, err: StoreError) -> Self {
        SaveError::Write {
            collection,
            message: err.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SaveError::Validation(_))
    }
}

/// Records for one product, grouped by sub-collection.
///
/// `None` leaves a sub-collection untouched; so does an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBundle {
    #[serde(default)]
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<Goal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plans: Option<Vec<Plan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Note>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roadmap: Option<Vec<RoadmapEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roadmap_details: Option<Vec<RoadmapDetail>>,
}

impl SaveBundle {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            ..Self::default()
        }
    }

    pub fn with_goals(mut self, goals: Vec<Goal>) -> Self {
        self.goals = Some(goals);
        self
    }

    pub fn with_plans(mut self, plans: Vec<Plan>) -> Self {
        self.plans = Some(plans);
        self
    }

    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn with_roadmap(mut self, roadmap: Vec<RoadmapEntry>) -> Self {
        self.roadmap = Some(roadmap);
        self
    }

    pub fn with_roadmap_details(mut self, details: Vec<RoadmapDetail>) -> Self {
        self.roadmap_details = Some(details);
        self
    }
}

/// Records written per sub-collection by a committed save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReport {
    pub goals: usize,
    pub plans: usize,
    pub notes: usize,
    pub roadmap: usize,
    pub roadmap_details: usize,
}

impl SaveReport {
    pub fn total(&self) -> usize {
        self.goals + self.plans + self.notes + self.roadmap + self.roadmap_details
    }

    /// Names of the sub-collections that had records written, in save order.
    pub fn collections(&self) -> Vec<&'static str> {
        [
            ("goals", self.goals),
            ("plans", self.plans),
            ("notes", self.notes),
            ("roadmap", self.roadmap),
            ("roadmapDetails", self.roadmap_details),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Save `bundle` atomically.
pub async fn save_product_bundle<S>(store: &S, bundle: &SaveBundle) -> Result<(), SaveError>
where
    S: Store + ?Sized,
{
    save_product_bundle_report(store, bundle).await.map(|_| ())
}

/// Save `bundle` atomically and report what was written.
pub async fn save_product_bundle_report<S>(
    store: &S,
    bundle: &SaveBundle,
) -> Result<SaveReport, SaveError>
where
    S: Store + ?Sized,
{
    let product_id = bundle.product_id.trim();
    if product_id.is_empty() {
        return Err(SaveError::Validation("productId is required".into()));
    }
    check_periods(bundle)?;

    let tx = Transaction::begin(store).await?;

    match tx.scope(write_bundle(store, product_id, bundle)).await {
        Ok(report) => {
            tx.commit().await?;
            tracing::info!(
                product_id,
                records = report.total(),
                "product bundle committed"
            );
            Ok(report)
        }
        Err(err) => {
            tracing::warn!(product_id, error = %err, "product bundle failed, rolling back");
            Err(tx.abort(err).await)
        }
    }
}

/// Goals and plans belong to a month; reject any outside 1..=12 before
/// anything reaches the store.
fn check_periods(bundle: &SaveBundle) -> Result<(), SaveError> {
    let goals = bundle.goals.iter().flatten().map(|g| ("goals", g.month, g.year));
    let plans = bundle.plans.iter().flatten().map(|p| ("plans", p.month, p.year));
    for (index, (collection, month, year)) in goals.enumerate().chain(plans.enumerate()) {
        Period::new(month, year).map_err(|err| {
            SaveError::Validation(format!("{}[{}]: {}", collection, index, err))
        })?;
    }
    Ok(())
}

/// Write every populated sub-collection, in order, keeping the first error.
async fn write_bundle<S>(
    store: &S,
    product_id: &str,
    bundle: &SaveBundle,
) -> Result<SaveReport, SaveError>
where
    S: Store + ?Sized,
{
    let mut first_error: Option<SaveError> = None;
    let mut settle = |outcome: Result<usize, SaveError>| match outcome {
        Ok(written) => written,
        Err(err) => {
            first_error.get_or_insert(err);
            0
        }
    };

    let goals = settle(write_collection(store, product_id, "goals", &bundle.goals).await);
    let plans = settle(write_collection(store, product_id, "plans", &bundle.plans).await);
    let notes = settle(write_collection(store, product_id, "notes", &bundle.notes).await);
    let roadmap = settle(write_collection(store, product_id, "roadmap", &bundle.roadmap).await);
    let roadmap_details = settle(
        write_collection(store, product_id, "roadmapDetails", &bundle.roadmap_details).await,
    );

    match first_error {
        Some(err) => Err(err),
        None => Ok(SaveReport {
            goals,
            plans,
            notes,
            roadmap,
            roadmap_details,
        }),
    }
}

/// Upsert every record of one sub-collection concurrently.
async fn write_collection<S, M>(
    store: &S,
    product_id: &str,
    collection: &'static str,
    records: &Option<Vec<M>>,
) -> Result<usize, SaveError>
where
    S: Store + ?Sized,
    M: ProductScoped,
{
    let records = match records {
        Some(records) if !records.is_empty() => records,
        _ => return Ok(0),
    };

    let table = store.table::<M>();
    let table = &table;
    let writes = records.iter().map(|record| {
        let mut record = record.clone();
        record.set_product_id(product_id);
        async move { table.upsert(&record).await }
    });
    let results = join_all(writes).await;

    for (index, result) in results.into_iter().enumerate() {
        if let Err(err) = result {
            tracing::warn!(product_id, collection, index, error = %err, "upsert failed");
            return Err(SaveError::write(collection, err));
        }
    }
    tracing::debug!(product_id, collection, records = records.len(), "sub-collection written");
    Ok(records.len())
}
