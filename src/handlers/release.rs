//! Release goals, plans and notes.
//!
//! Saving goals or plans goes through the bundle save, so the records are
//! upserted by natural key inside one transaction. Removal is explicit.

use serde_json::Value;

use crate::events::ProductSaved;
use crate::functions::HandlerError;
use crate::handlers::{data, Backend};
use crate::save::{save_product_bundle_report, SaveBundle};

/// Save `bundle` and announce it on the event bus.
pub(crate) async fn save_bundle(
    backend: &Backend,
    bundle: &SaveBundle,
) -> Result<Value, HandlerError> {
    let report = save_product_bundle_report(backend.store.as_ref(), bundle).await?;
    backend.events.publish::<ProductSaved>(ProductSaved {
        product_id: bundle.product_id.trim().to_string(),
        collections: report.collections().into_iter().map(String::from).collect(),
        records: report.total() as u32,
    });
    data(&report)
}

pub mod save_goals {
    use serde::Deserialize;
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::Backend;
    use crate::model::Goal;
    use crate::save::SaveBundle;

    pub const FUNCTION: &str = "saveGoals";

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Input {
        product_id: String,
        goals: Vec<Goal>,
    }

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_fields(&["productId", "goals"])
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let bundle = SaveBundle::new(input.product_id).with_goals(input.goals);
        super::save_bundle(ctx.backend(), &bundle).await
    }
}

pub mod save_plans {
    use serde::Deserialize;
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::Backend;
    use crate::model::Plan;
    use crate::save::SaveBundle;

    pub const FUNCTION: &str = "savePlans";

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Input {
        product_id: String,
        plans: Vec<Plan>,
    }

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_fields(&["productId", "plans"])
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let bundle = SaveBundle::new(input.product_id).with_plans(input.plans);
        super::save_bundle(ctx.backend(), &bundle).await
    }
}

pub mod delete_goal {
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{delete_by_id, Backend};
    use crate::model::Goal;

    pub const FUNCTION: &str = "deleteGoal";

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_field("id")
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        delete_by_id::<Goal>(&ctx, "Goal").await
    }
}

pub mod delete_plan {
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{delete_by_id, Backend};
    use crate::model::Plan;

    pub const FUNCTION: &str = "deletePlan";

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_field("id")
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        delete_by_id::<Plan>(&ctx, "Plan").await
    }
}

pub mod delete_note {
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{delete_by_id, Backend};
    use crate::model::Note;

    pub const FUNCTION: &str = "deleteNote";

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_field("id")
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        delete_by_id::<Note>(&ctx, "Note").await
    }
}
