//! Functions that change state announce it on the backend's event bus.

use product_hub::events::{ArtifactStored, MetricsReplaced, ProductSaved};
use serde_json::json;

use crate::support::{call, service, Collector};

#[tokio::test]
async fn bundle_save_publishes_product_saved() {
    let service = service();
    let saved = Collector::listen::<ProductSaved>(service.backend());

    let (status, _) = call(
        &service,
        "saveProductBundle",
        json!({
            "productId": "P1",
            "notes": [
                { "releaseNotesLink": "https://n/1.0", "version": "1.0", "createdOn": "2025-06-01" },
                { "releaseNotesLink": "https://n/1.1", "version": "1.1", "createdOn": "2025-06-15" }
            ]
        }),
    )
    .await;
    assert_eq!(status, 200);

    assert_eq!(
        saved.next(),
        ProductSaved {
            product_id: "P1".into(),
            collections: vec!["notes".into()],
            records: 2,
        }
    );
}

#[tokio::test]
async fn metrics_save_publishes_counts() {
    let service = service();
    let replaced = Collector::listen::<MetricsReplaced>(service.backend());

    let (status, _) = call(
        &service,
        "saveMetrics",
        json!({
            "productId": "P1",
            "month": 6,
            "year": 2025,
            "metrics": [{ "name": "nps", "value": 41.0 }]
        }),
    )
    .await;
    assert_eq!(status, 200);

    assert_eq!(
        replaced.next(),
        MetricsReplaced {
            product_id: "P1".into(),
            month: 6,
            year: 2025,
            deleted: 0,
            inserted: 1,
        }
    );
}

#[tokio::test]
async fn xml_save_publishes_artifact_stored() {
    let service = service();
    let stored = Collector::listen::<ArtifactStored>(service.backend());

    call(&service, "saveXmlFile", json!({ "path": "a.xml", "content": "<a/>" })).await;

    assert_eq!(
        stored.next(),
        ArtifactStored {
            bucket: "xml-storage".into(),
            path: "a.xml".into(),
        }
    );
}
