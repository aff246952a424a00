//! Monthly metrics. Saving replaces the whole period.

pub mod get_metrics {
    use serde::Deserialize;
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{data, Backend};
    use crate::model::{Metric, Period};
    use crate::store::{Filter, TablesExt};

    pub const FUNCTION: &str = "getMetrics";

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Input {
        product_id: String,
        month: u32,
        year: i32,
    }

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_fields(&["productId", "month", "year"])
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let period = Period::new(input.month, input.year)?;
        let filter = Filter::new()
            .eq("product_id", input.product_id)
            .eq("month", period.month())
            .eq("year", period.year());
        let mut metrics = ctx.backend().store.table::<Metric>().find(&filter).await?;
        metrics.sort_by(|a, b| a.name.cmp(&b.name));
        data(&metrics)
    }
}

pub mod save_metrics {
    use serde::Deserialize;
    use serde_json::Value;

    use crate::events::MetricsReplaced;
    use crate::functions::{Context, HandlerError};
    use crate::handlers::{data, Backend};
    use crate::model::{Metric, Period};
    use crate::save::replace_period;

    pub const FUNCTION: &str = "saveMetrics";

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Input {
        product_id: String,
        month: u32,
        year: i32,
        #[serde(default)]
        metrics: Vec<Metric>,
    }

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_fields(&["productId", "month", "year"])
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let period = Period::new(input.month, input.year)?;
        let backend = ctx.backend();

        let replaced =
            replace_period(backend.store.as_ref(), &input.product_id, period, &input.metrics)
                .await?;

        backend.events.publish::<MetricsReplaced>(MetricsReplaced {
            product_id: input.product_id.trim().to_string(),
            month: period.month(),
            year: period.year(),
            deleted: replaced.deleted as u32,
            inserted: replaced.inserted as u32,
        });
        data(&replaced)
    }
}
