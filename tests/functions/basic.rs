//! In-process dispatch of the backend functions.

use serde_json::json;

use crate::support::{call, seed_product, service};

#[tokio::test]
async fn every_function_is_registered() {
    let service = service();
    assert_eq!(
        service.functions(),
        vec![
            "createPortfolio",
            "createProduct",
            "deleteGoal",
            "deleteNote",
            "deletePlan",
            "deletePortfolio",
            "deleteProduct",
            "getMetrics",
            "getPortfolios",
            "getProductDetails",
            "getProducts",
            "getRoadmap",
            "getXmlFile",
            "listXmlFiles",
            "saveGoals",
            "saveMetrics",
            "savePlans",
            "saveProductBundle",
            "saveXmlFile",
            "updateProduct",
        ]
    );
}

#[tokio::test]
async fn guard_and_lookup_failures_map_to_statuses() {
    let service = service();

    let (status, body) = call(&service, "createPortfolio", json!({ "name": " " })).await;
    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Missing required fields for createPortfolio" })
    );

    let (status, body) = call(&service, "getWidgets", json!({})).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Unknown function: getWidgets");

    let (status, body) = call(&service, "deletePlan", json!({ "id": "nope" })).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Plan nope not found");

    let (status, _) = call(&service, "saveProductBundle", json!({ "productId": " " })).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn portfolios_are_listed_by_name() {
    let service = service();
    for name in ["Platform", "Data", "Mobile"] {
        call(&service, "createPortfolio", json!({ "name": name })).await;
    }

    let (status, body) = call(&service, "getPortfolios", json!({})).await;
    assert_eq!(status, 200);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Data", "Mobile", "Platform"]);
}

#[tokio::test]
async fn update_product_needs_a_field() {
    let service = service();
    let product_id = seed_product(&service).await;

    let (status, _) = call(&service, "updateProduct", json!({ "id": product_id })).await;
    assert_eq!(status, 400);

    let (status, body) = call(
        &service,
        "updateProduct",
        json!({ "id": product_id, "name": "Payments" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Payments");

    let (status, _) = call(&service, "updateProduct", json!({ "id": "missing", "name": "X" })).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn product_details_filter_goals_by_period() {
    let service = service();
    let product_id = seed_product(&service).await;

    let goal = |description: &str, month: u32| {
        json!({
            "description": description,
            "currentState": "now",
            "targetState": "later",
            "month": month,
            "year": 2025
        })
    };
    let (status, _) = call(
        &service,
        "saveGoals",
        json!({ "productId": product_id, "goals": [goal("Ship SSO", 5), goal("Cut latency", 6)] }),
    )
    .await;
    assert_eq!(status, 200);

    let (_, all) = call(&service, "getProductDetails", json!({ "productId": product_id })).await;
    assert_eq!(all["data"]["goals"].as_array().map(Vec::len), Some(2));

    let (_, june) = call(
        &service,
        "getProductDetails",
        json!({ "productId": product_id, "month": 6, "year": 2025 }),
    )
    .await;
    assert_eq!(june["data"]["goals"][0]["description"], "Cut latency");
    assert_eq!(june["data"]["goals"].as_array().map(Vec::len), Some(1));

    let (status, body) = call(
        &service,
        "getProductDetails",
        json!({ "productId": product_id, "month": 6 }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "month and year must be given together");

    let (status, _) = call(
        &service,
        "getProductDetails",
        json!({ "productId": product_id, "month": 13, "year": 2025 }),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn roadmap_is_newest_first() {
    let service = service();
    let (status, _) = call(
        &service,
        "saveProductBundle",
        json!({
            "productId": "P1",
            "roadmap": [
                { "version": "1.0", "link": "https://r/1.0", "createdOn": "2025-01-10" },
                { "version": "2.0", "link": "https://r/2.0", "createdOn": "2025-06-10" }
            ],
            "roadmapDetails": [
                { "version": "2.0", "detail": "SSO", "createdOn": "2025-06-10" }
            ]
        }),
    )
    .await;
    assert_eq!(status, 200);

    let (_, body) = call(&service, "getRoadmap", json!({ "productId": "P1" })).await;
    assert_eq!(body["data"]["roadmap"][0]["version"], "2.0");
    assert_eq!(body["data"]["roadmap"][1]["version"], "1.0");
    assert_eq!(body["data"]["roadmapDetails"][0]["detail"], "SSO");
}

#[tokio::test]
async fn xml_files_round_trip() {
    let service = service();

    let (status, body) = call(
        &service,
        "saveXmlFile",
        json!({ "path": "exports/billing.xml", "content": "<product/>" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!({ "path": "exports/billing.xml" }));

    let (_, body) = call(&service, "listXmlFiles", json!({ "prefix": "exports/" })).await;
    assert_eq!(body["data"], json!(["exports/billing.xml"]));

    let (_, body) = call(&service, "getXmlFile", json!({ "path": "exports/billing.xml" })).await;
    assert_eq!(body["data"]["content"], "<product/>");

    let (status, _) = call(&service, "getXmlFile", json!({ "path": "exports/none.xml" })).await;
    assert_eq!(status, 404);
}
