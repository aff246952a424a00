//! XML artifacts in the configured bucket.

pub mod list_xml_files {
    use serde::Deserialize;
    use serde_json::Value;

    use crate::functions::{Context, HandlerError};
    use crate::handlers::{data, Backend};

    pub const FUNCTION: &str = "listXmlFiles";

    #[derive(Deserialize)]
    struct Input {
        #[serde(default)]
        prefix: String,
    }

    pub fn guard(_ctx: &Context<Backend>) -> bool {
        true
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let files = ctx.backend().blobs.list(&input.prefix).await?;
        data(&files)
    }
}

pub mod get_xml_file {
    use serde::Deserialize;
    use serde_json::{json, Value};

    use crate::functions::{Context, HandlerError};
    use crate::handlers::Backend;

    pub const FUNCTION: &str = "getXmlFile";

    #[derive(Deserialize)]
    struct Input {
        path: String,
    }

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_field("path")
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let content = ctx.backend().blobs.download(&input.path).await?;
        Ok(json!({ "path": input.path, "content": content }))
    }
}

pub mod save_xml_file {
    use serde::Deserialize;
    use serde_json::{json, Value};

    use crate::blob::UploadOptions;
    use crate::events::ArtifactStored;
    use crate::functions::{Context, HandlerError};
    use crate::handlers::Backend;

    pub const FUNCTION: &str = "saveXmlFile";

    #[derive(Deserialize)]
    struct Input {
        path: String,
        content: String,
    }

    pub fn guard(ctx: &Context<Backend>) -> bool {
        ctx.has_fields(&["path", "content"])
    }

    pub async fn handle(ctx: Context<Backend>) -> Result<Value, HandlerError> {
        let input = ctx.input::<Input>()?;
        let backend = ctx.backend();
        backend
            .blobs
            .upload(&input.path, input.content, UploadOptions::xml())
            .await?;

        tracing::info!(bucket = backend.bucket(), path = %input.path, "xml file stored");
        backend.events.publish::<ArtifactStored>(ArtifactStored {
            bucket: backend.bucket().to_string(),
            path: input.path.clone(),
        });
        Ok(json!({ "path": input.path }))
    }
}
