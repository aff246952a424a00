use serde::{Deserialize, Serialize};

use super::{SaveError, Transaction};
use crate::model::{Metric, Period};
use crate::store::{Filter, Store, TablesExt};

/// Outcome of a committed period replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReplaced {
    pub deleted: usize,
    pub inserted: usize,
}

/// Replace every metric of `product_id` for `period` with `metrics`.
///
/// Runs in one transaction: delete the period's rows, insert the new set,
/// commit. Product, month and year on each metric are taken from the
/// arguments.
pub async fn replace_period<S>(
    store: &S,
    product_id: &str,
    period: Period,
    metrics: &[Metric],
) -> Result<PeriodReplaced, SaveError>
where
    S: Store + ?Sized,
{
    let product_id = product_id.trim();
    if product_id.is_empty() {
        return Err(SaveError::Validation("productId is required".into()));
    }

    let rows: Vec<Metric> = metrics
        .iter()
        .map(|metric| Metric {
            id: None,
            product_id: product_id.to_string(),
            month: period.month(),
            year: period.year(),
            ..metric.clone()
        })
        .collect();

    let tx = Transaction::begin(store).await?;
    let table = store.table::<Metric>();
    let scope = Filter::new()
        .eq("product_id", product_id)
        .eq("month", period.month())
        .eq("year", period.year());

    let deleted = match tx.scope(table.delete(&scope)).await {
        Ok(deleted) => deleted,
        Err(err) => return Err(tx.abort(SaveError::write("metrics", err)).await),
    };
    let inserted = match tx.scope(table.insert_many(&rows)).await {
        Ok(inserted) => inserted.len(),
        Err(err) => return Err(tx.abort(SaveError::write("metrics", err)).await),
    };

    tx.commit().await?;
    tracing::info!(product_id, %period, deleted, inserted, "metrics period replaced");
    Ok(PeriodReplaced { deleted, inserted })
}
