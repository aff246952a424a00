use std::sync::Arc;
use std::time::Duration;

use product_hub::invoke::{InvocationErrorKind, InvokeOptions, InvokePresets, Invoker};
use serde_json::json;
use tokio::time::Instant;

use crate::support::{ScriptedTransport, Step};

#[tokio::test(start_paused = true)]
async fn permanent_retryable_failure_uses_every_attempt() {
    for retries in 1..=4 {
        let transport = Arc::new(ScriptedTransport::always(Step::Fail(
            "network error: connection refused".into(),
        )));
        let invoker = Invoker::new(transport.clone());
        let options = InvokeOptions::default()
            .with_retries(retries)
            .with_retry_delay(Duration::from_millis(1000));

        let started = Instant::now();
        let err = invoker
            .call("getPortfolios", json!({}), options)
            .await
            .unwrap_err();

        assert_eq!(err.attempts, retries);
        assert_eq!(transport.calls().len(), retries as usize);
        assert!(err.retryable);
        assert_eq!(err.kind, InvocationErrorKind::Transport);
        assert_eq!(err.message, "network error: connection refused");
        assert_eq!(started.elapsed(), options.total_backoff());
    }
}

#[tokio::test(start_paused = true)]
async fn non_retryable_failure_stops_at_first_attempt() {
    let transport = Arc::new(ScriptedTransport::always(Step::remote_error(
        "Unknown operation: getWidgets",
    )));
    let invoker = Invoker::new(transport.clone());

    let started = Instant::now();
    let err = invoker
        .call("getWidgets", json!({}), InvokeOptions::default().with_retries(5))
        .await
        .unwrap_err();

    assert_eq!(err.attempts, 1);
    assert!(!err.retryable);
    assert_eq!(err.kind, InvocationErrorKind::Remote);
    assert_eq!(err.to_string(), "Unknown operation: getWidgets");
    assert_eq!(transport.calls().len(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn service_unavailable_twice_then_success() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Step::remote_error("503 Service Unavailable"),
        Step::remote_error("503 Service Unavailable"),
        Step::ok(json!([{ "id": "pf-1", "name": "Core" }])),
    ]));
    let invoker = Invoker::new(transport.clone());

    let started = Instant::now();
    let invoked = invoker
        .call(
            "getPortfolios",
            json!({}),
            InvokeOptions::default()
                .with_retries(3)
                .with_retry_delay(Duration::from_millis(1000))
                .with_timeout(Duration::from_millis(15_000)),
        )
        .await
        .unwrap();

    assert_eq!(invoked.attempts, 3);
    assert_eq!(invoked.payload, json!([{ "id": "pf-1", "name": "Core" }]));
    assert_eq!(started.elapsed(), Duration::from_millis(2500));
}

#[tokio::test(start_paused = true)]
async fn last_failure_message_is_surfaced_verbatim() {
    let transport = ScriptedTransport::new(vec![
        Step::Fail("Request failed: network error: reset".into()),
        Step::remote_error("Internal Server Error: pool exhausted"),
    ]);
    let invoker = Invoker::new(transport);

    let err = invoker
        .invoke("saveProductBundle", json!({ "productId": "P1" }), InvokeOptions::write())
        .await
        .unwrap_err();

    assert_eq!(err.attempts, 2);
    assert_eq!(err.message, "Internal Server Error: pool exhausted");
    assert_eq!(err.kind, InvocationErrorKind::Remote);
}

#[tokio::test(start_paused = true)]
async fn zero_retries_still_makes_one_attempt() {
    let transport = Arc::new(ScriptedTransport::always(Step::Fail("503".into())));
    let invoker = Invoker::new(transport.clone());

    let err = invoker
        .call("getPortfolios", json!({}), InvokeOptions::default().with_retries(0))
        .await
        .unwrap_err();

    assert_eq!(err.attempts, 1);
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn empty_function_name_is_rejected_without_calling() {
    let transport = Arc::new(ScriptedTransport::always(Step::ok(json!(null))));
    let invoker = Invoker::new(transport.clone());

    let err = invoker
        .invoke("  ", json!({}), InvokeOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind, InvocationErrorKind::Validation);
    assert_eq!(err.attempts, 0);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn payload_and_parameters_pass_through() {
    let transport = Arc::new(ScriptedTransport::always(Step::Reply(
        product_hub::Envelope {
            success: true,
            data: None,
            error: None,
        },
    )));
    let invoker = Invoker::new(transport.clone());

    let payload = invoker
        .read("getMetrics", json!({ "productId": "P1", "month": 6, "year": 2025 }))
        .await
        .unwrap();

    assert_eq!(payload, json!(null));
    assert_eq!(
        transport.calls(),
        vec![(
            "getMetrics".to_string(),
            json!({ "productId": "P1", "month": 6, "year": 2025 })
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn configured_presets_drive_read_and_write() {
    let transport = Arc::new(ScriptedTransport::always(Step::Fail("timeout".into())));
    let presets = InvokePresets {
        read: InvokeOptions::read().with_retries(4),
        write: InvokeOptions::write().with_retries(1),
    };
    let invoker = Invoker::new(transport.clone()).with_presets(presets);

    invoker.read("getPortfolios", json!({})).await.unwrap_err();
    assert_eq!(transport.calls().len(), 4);

    invoker.write("deleteGoal", json!({ "id": "g1" })).await.unwrap_err();
    assert_eq!(transport.calls().len(), 5);
}

#[tokio::test]
async fn invoke_as_decodes_the_payload() {
    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct Pong {
        pong: bool,
    }

    let invoker = Invoker::new(ScriptedTransport::always(Step::ok(json!({ "pong": true }))));
    let pong: Pong = invoker
        .invoke_as("ping", json!({}), InvokeOptions::default())
        .await
        .unwrap();
    assert_eq!(pong, Pong { pong: true });

    let err = invoker
        .invoke_as::<Vec<String>>("ping", json!({}), InvokeOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.attempts, 1);
    assert!(!err.retryable);
}
