pub mod get_products {
    use serde::Deserialize;
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{data, Backend};
    use crate::model::Product;
    use crate::store::{Filter, TablesExt};

    pub const FUNCTION: &str = "getProducts";

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Input {
        #[serde(default)]
        portfolio_id: Option<String>,
    }

    pub fn guard(_ctx: &Context<Backend>) -> bool {
        true
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let filter = match input.portfolio_id {
            Some(portfolio_id) => Filter::new().eq("portfolio_id", portfolio_id),
            None => Filter::new(),
        };
        let mut products = ctx.backend().store.table::<Product>().find(&filter).await?;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        data(&products)
    }
}

pub mod create_product {
    use serde::Deserialize;
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{data, Backend};
    use crate::model::Product;
    use crate::store::TablesExt;

    pub const FUNCTION: &str = "createProduct";

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Input {
        portfolio_id: String,
        name: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        owner: Option<String>,
    }

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_fields(&["portfolioId", "name"])
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let product = Product {
            id: None,
            portfolio_id: input.portfolio_id,
            name: input.name.trim().to_string(),
            description: input.description,
            owner: input.owner,
        };
        let stored = ctx.backend().store.table::<Product>().insert(&product).await?;
        tracing::info!(id = ?stored.id, portfolio_id = %stored.portfolio_id, "product created");
        data(&stored)
    }
}

pub mod update_product {
    use serde::Deserialize;
    use serde_json::{Map, Value};

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{data, Backend};
    use crate::model::Product;
    use crate::store::TablesExt;

    pub const FUNCTION: &str = "updateProduct";

    #[derive(Deserialize)]
    struct Input {
        id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        owner: Option<String>,
    }

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_field("id")
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;

        let mut patch = Map::new();
        for (field, value) in [
            ("name", input.name),
            ("description", input.description),
            ("owner", input.owner),
        ] {
            if let Some(value) = value {
                patch.insert(field.to_string(), Value::String(value));
            }
        }
        if patch.is_empty() {
            return Err(HandlerError::Invalid(
                "updateProduct needs at least one of name, description, owner".into(),
            ));
        }

        let updated = ctx
            .backend()
            .store
            .table::<Product>()
            .update_by_id(&input.id, Value::Object(patch))
            .await?
            .ok_or_else(|| HandlerError::NotFound(format!("Product {}", input.id)))?;
        data(&updated)
    }
}

pub mod delete_product {
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{delete_by_id, Backend};
    use crate::model::Product;

    pub const FUNCTION: &str = "deleteProduct";

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_field("id")
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        delete_by_id::<Product>(&ctx, "Product").await
    }
}

/// Everything recorded for one product, optionally narrowed to a period.
pub mod get_product_details {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{data, Backend};
    use crate::model::{Goal, Note, Period, Plan, Product, RoadmapDetail, RoadmapEntry};
    use crate::store::{Filter, TablesExt};

    pub const FUNCTION: &str = "getProductDetails";

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Input {
        product_id: String,
        #[serde(default)]
        month: Option<u32>,
        #[serde(default)]
        year: Option<i32>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Details {
        product: Product,
        goals: Vec<Goal>,
        plans: Vec<Plan>,
        notes: Vec<Note>,
        roadmap: Vec<RoadmapEntry>,
        roadmap_details: Vec<RoadmapDetail>,
    }

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_field("productId")
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let store = ctx.backend().store.as_ref();

        let by_product = Filter::new().eq("product_id", input.product_id.as_str());
        let by_period = match (input.month, input.year) {
            (Some(month), Some(year)) => {
                let period = Period::new(month, year)?;
                by_product
                    .clone()
                    .eq("month", period.month())
                    .eq("year", period.year())
            }
            (None, None) => by_product.clone(),
            _ => {
                return Err(HandlerError::Invalid(
                    "month and year must be given together".into(),
                ))
            }
        };

        let products = store.table::<Product>();
        let goals = store.table::<Goal>();
        let plans = store.table::<Plan>();
        let notes = store.table::<Note>();
        let roadmap = store.table::<RoadmapEntry>();
        let roadmap_details = store.table::<RoadmapDetail>();

        let (product, goals, plans, notes, roadmap, roadmap_details) = tokio::try_join!(
            products.get(&input.product_id),
            goals.find(&by_period),
            plans.find(&by_period),
            notes.find(&by_product),
            roadmap.find(&by_product),
            roadmap_details.find(&by_product),
        )?;

        let product =
            product.ok_or_else(|| HandlerError::NotFound(format!("Product {}", input.product_id)))?;

        data(&Details {
            product,
            goals,
            plans,
            notes,
            roadmap,
            roadmap_details,
        })
    }
}
