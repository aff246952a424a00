pub mod get_portfolios {
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{data, Backend};
    use crate::model::Portfolio;
    use crate::store::TablesExt;

    pub const FUNCTION: &str = "getPortfolios";

    pub fn guard(_ctx: &Context<Backend>) -> bool {
        true
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let mut portfolios = ctx.backend().store.table::<Portfolio>().all().await?;
        portfolios.sort_by(|a, b| a.name.cmp(&b.name));
        data(&portfolios)
    }
}

pub mod create_portfolio {
    use serde::Deserialize;
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{data, Backend};
    use crate::model::Portfolio;
    use crate::store::TablesExt;

    pub const FUNCTION: &str = "createPortfolio";

    #[derive(Deserialize)]
    struct Input {
        name: String,
        #[serde(default)]
        description: Option<String>,
    }

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_field("name")
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let portfolio = Portfolio {
            id: None,
            name: input.name.trim().to_string(),
            description: input.description,
        };
        let stored = ctx.backend().store.table::<Portfolio>().insert(&portfolio).await?;
        tracing::info!(id = ?stored.id, name = %stored.name, "portfolio created");
        data(&stored)
    }
}

pub mod delete_portfolio {
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{delete_by_id, Backend};
    use crate::model::Portfolio;

    pub const FUNCTION: &str = "deletePortfolio";

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_field("id")
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        delete_by_id::<Portfolio>(&ctx, "Portfolio").await
    }
}
