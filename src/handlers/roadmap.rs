pub mod get_roadmap {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{data, Backend};
    use crate::model::{RoadmapDetail, RoadmapEntry};
    use crate::store::{Filter, TablesExt};

    pub const FUNCTION: &str = "getRoadmap";

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Input {
        product_id: String,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Roadmap {
        roadmap: Vec<RoadmapEntry>,
        roadmap_details: Vec<RoadmapDetail>,
    }

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_field("productId")
    }

    /// Entries newest first; details grouped under the same ordering.
    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let store = ctx.backend().store.as_ref();
        let filter = Filter::new().eq("product_id", input.product_id);

        let entries = store.table::<RoadmapEntry>();
        let details = store.table::<RoadmapDetail>();
        let (mut roadmap, mut roadmap_details) =
            tokio::try_join!(entries.find(&filter), details.find(&filter))?;

        roadmap.sort_by(|a, b| b.created_on.cmp(&a.created_on).then(b.version.cmp(&a.version)));
        roadmap_details
            .sort_by(|a, b| b.created_on.cmp(&a.created_on).then(b.version.cmp(&a.version)));

        data(&Roadmap {
            roadmap,
            roadmap_details,
        })
    }
}
