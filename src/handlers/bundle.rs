pub mod save_product_bundle {
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::release::save_bundle;
    use crate::handlers::Backend;
    use crate::save::SaveBundle;

    pub const FUNCTION: &str = "saveProductBundle";

    /// `productId` is checked by the save itself so a blank id reports the
    /// save's validation error.
    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.raw_input().is_object()
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let bundle = ctx.input::<SaveBundle>()?;
        save_bundle(ctx.backend(), &bundle).await
    }
}
