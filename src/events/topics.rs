use serde::{Deserialize, Serialize};

use super::Topic;

/// A product bundle was committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSaved {
    pub product_id: String,
    /// Sub-collections that carried records, in save order.
    pub collections: Vec<String>,
    pub records: u32,
}

impl Topic for ProductSaved {
    const NAME: &'static str = "product.saved";
    type Payload = ProductSaved;
}

/// A period's metrics were replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsReplaced {
    pub product_id: String,
    pub month: u32,
    pub year: i32,
    pub deleted: u32,
    pub inserted: u32,
}

impl Topic for MetricsReplaced {
    const NAME: &'static str = "metrics.replaced";
    type Payload = MetricsReplaced;
}

/// An XML artifact was written to blob storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactStored {
    pub bucket: String,
    pub path: String,
}

impl Topic for ArtifactStored {
    const NAME: &'static str = "artifact.stored";
    type Payload = ArtifactStored;
}
