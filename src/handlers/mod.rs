//! Backend functions.
//!
//! Every function is a convention module (`FUNCTION`, `guard`, `handle`)
//! registered on a `Service<Backend>` by [`service`]:
//!
//! | Module | Functions |
//! |---|---|
//! | `portfolios` | getPortfolios, createPortfolio, deletePortfolio |
//! | `products` | getProducts, createProduct, updateProduct, deleteProduct, getProductDetails |
//! | `metrics` | getMetrics, saveMetrics |
//! | `release` | saveGoals, savePlans, deleteGoal, deletePlan, deleteNote |
//! | `roadmap` | getRoadmap |
//! | `bundle` | saveProductBundle |
//! | `xml` | listXmlFiles, getXmlFile, saveXmlFile |

pub mod bundle;
pub mod metrics;
pub mod portfolios;
pub mod products;
pub mod release;
pub mod roadmap;
pub mod xml;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::blob::{BlobStore, InMemoryBlobStore, DEFAULT_BUCKET};
use crate::events::EventBus;
use crate::functions::{Context, HandlerError, Service};
use crate::model::Model;
use crate::store::{InMemoryStore, Store, TablesExt};

/// Resources shared by every backend function.
#[derive(Clone)]
pub struct Backend {
    pub store: Arc<dyn Store>,
    pub blobs: Arc<dyn BlobStore>,
    pub events: EventBus,
}

impl Backend {
    pub fn new(store: Arc<dyn Store>, blobs: Arc<dyn BlobStore>, events: EventBus) -> Self {
        Self {
            store,
            blobs,
            events,
        }
    }

    /// In-memory store and blob store, with a fresh event bus.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryBlobStore::new(DEFAULT_BUCKET)),
            EventBus::new(),
        )
    }

    /// Bucket the blob store is scoped to.
    pub fn bucket(&self) -> &str {
        self.blobs.bucket()
    }
}

/// A service with every backend function registered.
pub fn service(backend: Backend) -> Service<Backend> {
    crate::register_handlers!(
        Service::new(backend),
        portfolios::get_portfolios,
        portfolios::create_portfolio,
        portfolios::delete_portfolio,
        products::get_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::get_product_details,
        metrics::get_metrics,
        metrics::save_metrics,
        release::save_goals,
        release::save_plans,
        release::delete_goal,
        release::delete_plan,
        release::delete_note,
        roadmap::get_roadmap,
        bundle::save_product_bundle,
        xml::list_xml_files,
        xml::get_xml_file,
        xml::save_xml_file,
    )
}

/// Input of every delete-by-id function.
#[derive(serde::Deserialize)]
pub(crate) struct IdInput {
    pub id: String,
}

/// Serialize a handler result.
pub(crate) fn data<T: Serialize>(value: &T) -> Result<Value, HandlerError> {
    serde_json::to_value(value).map_err(|e| HandlerError::Other(Box::new(e)))
}

/// Delete the `M` record named by the input `id`; `NotFound` when absent.
pub(crate) async fn delete_by_id<M: Model>(
    ctx: &Context<Backend>,
    label: &str,
) -> Result<Value, HandlerError> {
    let input = ctx.input::<IdInput>()?;
    if !ctx.backend().store.table::<M>().delete_by_id(&input.id).await? {
        return Err(HandlerError::NotFound(format!("{} {}", label, input.id)));
    }
    tracing::info!(table = M::TABLE, id = %input.id, "record deleted");
    Ok(serde_json::json!({ "id": input.id }))
}
