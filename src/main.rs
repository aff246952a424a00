use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use product_hub::blob::{InMemoryBlobStore, RestBlobStore};
use product_hub::config::Config;
use product_hub::store::{InMemoryStore, RestStore};
use product_hub::{functions, handlers, telemetry, Backend, EventBus};

/// Serve the product-hub backend functions over HTTP.
#[derive(Debug, Parser)]
#[command(name = "product-hub", version, about)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overriding `server.bind`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    telemetry::init_tracing(&config.log)?;

    let backend = match &config.store {
        Some(store) => {
            tracing::info!(url = %store.url, bucket = %config.blobs.bucket, "using hosted store");
            Backend::new(
                Arc::new(RestStore::new(&store.url, &store.api_key)?),
                Arc::new(RestBlobStore::new(
                    &store.url,
                    &store.api_key,
                    config.blobs.bucket.clone(),
                )?),
                EventBus::new(),
            )
        }
        None => {
            tracing::warn!("no [store] configured; using the in-memory store");
            Backend::new(
                Arc::new(InMemoryStore::new()),
                Arc::new(InMemoryBlobStore::new(config.blobs.bucket.clone())),
                EventBus::new(),
            )
        }
    };

    let service = Arc::new(handlers::service(backend));
    tracing::info!(functions = service.functions().len(), "functions registered");
    functions::serve(service, &config.server.bind).await?;
    Ok(())
}
