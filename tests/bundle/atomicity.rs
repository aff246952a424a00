use product_hub::save::{save_product_bundle, save_product_bundle_report, SaveError, TransactionStage};
use product_hub::store::{COMMIT_TRANSACTION, ROLLBACK_TRANSACTION, START_TRANSACTION};
use product_hub::SaveBundle;

use crate::support::{goal, note, plan, Call, FaultyStore};

#[tokio::test]
async fn blank_product_id_never_reaches_the_store() {
    let store = FaultyStore::new();
    let bundle = SaveBundle::new("").with_goals(vec![goal("Ship SSO")]);

    let err = save_product_bundle(&store, &bundle).await.unwrap_err();

    assert_eq!(err, SaveError::Validation("productId is required".into()));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn all_collections_commit_together() {
    let store = FaultyStore::new();
    let bundle = SaveBundle::new("P1")
        .with_goals(vec![goal("Ship SSO"), goal("Cut latency")])
        .with_plans(vec![plan("SAML"), plan("OIDC")])
        .with_notes(vec![note("1.0")]);

    let report = save_product_bundle_report(&store, &bundle).await.unwrap();

    assert_eq!(report.total(), 5);
    assert_eq!(store.rpcs(), vec![START_TRANSACTION, COMMIT_TRANSACTION]);
    assert_eq!(store.inner.rows("release_goals").len(), 2);
    assert_eq!(store.inner.rows("release_plans").len(), 2);
    assert_eq!(store.inner.rows("release_notes").len(), 1);
    assert!(!store.inner.in_transaction());
}

#[tokio::test]
async fn one_failing_plan_rolls_back_everything() {
    let store = FaultyStore::new();
    store.fail_upsert("release_plans", "title", "OIDC");
    let bundle = SaveBundle::new("P1")
        .with_goals(vec![goal("Ship SSO")])
        .with_plans(vec![plan("SAML"), plan("OIDC"), plan("SCIM")]);

    let err = save_product_bundle(&store, &bundle).await.unwrap_err();

    match &err {
        SaveError::Write { collection, message } => {
            assert_eq!(*collection, "plans");
            assert!(message.contains("upsert rejected for release_plans"));
        }
        other => panic!("expected a write error, got {other:?}"),
    }
    assert_eq!(store.rpcs(), vec![START_TRANSACTION, ROLLBACK_TRANSACTION]);
    assert!(store.inner.rows("release_goals").is_empty());
    assert!(store.inner.rows("release_plans").is_empty());
    assert!(!store.inner.in_transaction());
}

#[tokio::test]
async fn failed_begin_writes_nothing() {
    let store = FaultyStore::new();
    store.fail_rpc(START_TRANSACTION);
    let bundle = SaveBundle::new("P1").with_notes(vec![note("1.0")]);

    let err = save_product_bundle(&store, &bundle).await.unwrap_err();

    assert!(matches!(
        err,
        SaveError::Transaction { stage: TransactionStage::Begin, .. }
    ));
    assert_eq!(store.calls(), vec![Call::Rpc(START_TRANSACTION.into())]);
}

#[tokio::test]
async fn failed_commit_is_reported() {
    let store = FaultyStore::new();
    store.fail_rpc(COMMIT_TRANSACTION);
    let bundle = SaveBundle::new("P1").with_notes(vec![note("1.0")]);

    let err = save_product_bundle(&store, &bundle).await.unwrap_err();

    assert!(matches!(
        err,
        SaveError::Transaction { stage: TransactionStage::Commit, .. }
    ));
    assert!(err.to_string().starts_with("failed to commit transaction"));
}

#[tokio::test]
async fn failed_rollback_keeps_the_original_error() {
    let store = FaultyStore::new();
    store.fail_upsert("release_notes", "version", "1.0");
    store.fail_rpc(ROLLBACK_TRANSACTION);
    let bundle = SaveBundle::new("P1").with_notes(vec![note("1.0")]);

    let err = save_product_bundle(&store, &bundle).await.unwrap_err();

    assert!(matches!(err, SaveError::Write { collection: "notes", .. }));
    assert_eq!(store.rpcs(), vec![START_TRANSACTION, ROLLBACK_TRANSACTION]);
}

#[tokio::test]
async fn first_error_by_collection_order_wins() {
    let store = FaultyStore::new();
    store.fail_upsert("release_goals", "description", "Cut latency");
    store.fail_upsert("release_plans", "title", "SAML");
    let bundle = SaveBundle::new("P1")
        .with_goals(vec![goal("Ship SSO"), goal("Cut latency")])
        .with_plans(vec![plan("SAML")])
        .with_notes(vec![note("1.0")]);

    let err = save_product_bundle(&store, &bundle).await.unwrap_err();

    assert!(matches!(err, SaveError::Write { collection: "goals", .. }));
    // Later collections are still attempted before rolling back.
    let upserted: Vec<String> = store
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Upsert(table, _) => Some(table),
            _ => None,
        })
        .collect();
    assert_eq!(
        upserted,
        vec!["release_goals", "release_goals", "release_plans", "release_notes"]
    );
    assert!(store.inner.rows("release_notes").is_empty());
}

#[tokio::test]
async fn empty_collections_are_left_untouched() {
    let store = FaultyStore::new();
    let bundle = SaveBundle::new("P1").with_goals(vec![]);

    let report = save_product_bundle_report(&store, &bundle).await.unwrap();

    assert_eq!(report.total(), 0);
    assert!(store
        .calls()
        .iter()
        .all(|call| matches!(call, Call::Rpc(_))));
}

#[tokio::test]
async fn records_are_scoped_to_the_bundle_product() {
    let store = FaultyStore::new();
    let mut stray = plan("SAML");
    stray.product_id = "P9".into();
    let bundle = SaveBundle::new(" P1 ").with_plans(vec![stray]);

    save_product_bundle(&store, &bundle).await.unwrap();

    let rows = store.inner.rows("release_plans");
    assert_eq!(rows[0]["product_id"], "P1");
}

#[tokio::test]
async fn out_of_range_months_never_reach_the_store() {
    let store = FaultyStore::new();
    for month in [0, 13] {
        let mut bad = plan("OIDC");
        bad.month = month;
        let bundle = SaveBundle::new("P1")
            .with_goals(vec![goal("Ship SSO")])
            .with_plans(vec![plan("SAML"), bad]);

        let err = save_product_bundle(&store, &bundle).await.unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().starts_with("plans[1]: month must be between 1 and 12"));
    }
    assert!(store.calls().is_empty());
}
