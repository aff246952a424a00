use std::time::Duration;

use product_hub::save::{save_product_bundle, Transaction};
use product_hub::store::{InMemoryStore, Row, Store};
use product_hub::SaveBundle;
use serde_json::json;

use crate::support::{goal, note, plan};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_saves_both_commit() {
    let store = InMemoryStore::new();

    let saves = (1..=8).map(|n| {
        let store = store.clone();
        tokio::spawn(async move {
            let bundle = SaveBundle::new(format!("P{}", n))
                .with_goals(vec![goal("Ship SSO"), goal("Cut latency")])
                .with_plans(vec![plan("SAML")])
                .with_notes(vec![note("1.0")]);
            save_product_bundle(&store, &bundle).await
        })
    });
    for save in futures::future::join_all(saves).await {
        save.unwrap().unwrap();
    }

    assert_eq!(store.rows("release_goals").len(), 16);
    assert_eq!(store.rows("release_plans").len(), 8);
    assert_eq!(store.rows("release_notes").len(), 8);
    assert!(!store.in_transaction());
}

#[tokio::test]
async fn rollback_keeps_writes_made_outside_the_transaction() {
    let store = InMemoryStore::new();
    let tx = Transaction::begin(&store).await.unwrap();
    tx.scope(store.insert("release_notes", vec![row("1.0")]))
        .await
        .unwrap();

    let outside = tokio::spawn({
        let store = store.clone();
        async move { store.insert("portfolios", vec![portfolio("Platform")]).await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!outside.is_finished());

    tx.rollback().await.unwrap();
    outside.await.unwrap().unwrap();

    assert!(store.rows("release_notes").is_empty());
    assert_eq!(store.rows("portfolios").len(), 1);
}

#[tokio::test]
async fn a_save_waits_for_an_open_transaction() {
    let store = InMemoryStore::new();
    let tx = Transaction::begin(&store).await.unwrap();

    let save = tokio::spawn({
        let store = store.clone();
        async move {
            save_product_bundle(&store, &SaveBundle::new("P2").with_notes(vec![note("2.0")])).await
        }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!save.is_finished());

    tx.commit().await.unwrap();
    save.await.unwrap().unwrap();
    assert_eq!(store.rows("release_notes").len(), 1);
}

fn row(version: &str) -> Row {
    json!({ "product_id": "P1", "version": version })
        .as_object()
        .cloned()
        .unwrap()
}

fn portfolio(name: &str) -> Row {
    json!({ "name": name }).as_object().cloned().unwrap()
}
