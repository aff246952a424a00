use std::sync::mpsc::{channel, Receiver};
use std::sync::Mutex;
use std::time::Duration;

use product_hub::events::Topic;
use product_hub::functions::{Service, Session};
use product_hub::handlers::{self, Backend};
use serde_json::{json, Value};

pub fn service() -> Service<Backend> {
    handlers::service(Backend::in_memory())
}

pub async fn call(service: &Service<Backend>, function: &str, input: Value) -> (u16, Value) {
    let (status, envelope) = service
        .dispatch_envelope(function, input, Session::new())
        .await;
    (status, serde_json::to_value(envelope).unwrap())
}

/// Create a portfolio and a product in it, returning the product id.
pub async fn seed_product(service: &Service<Backend>) -> String {
    let portfolio = service
        .dispatch("createPortfolio", json!({ "name": "Platform" }), Session::new())
        .await
        .unwrap();
    let product = service
        .dispatch(
            "createProduct",
            json!({ "portfolioId": portfolio["id"], "name": "Billing" }),
            Session::new(),
        )
        .await
        .unwrap();
    product["id"].as_str().unwrap().to_string()
}

/// Collects every payload published on topic `T`.
pub struct Collector<T> {
    rx: Mutex<Receiver<T>>,
}

impl<T: Send + 'static> Collector<T> {
    pub fn listen<P>(backend: &Backend) -> Self
    where
        P: Topic<Payload = T>,
    {
        let (tx, rx) = channel();
        let tx = Mutex::new(tx);
        backend.events.subscribe::<P, _>(move |payload| {
            let _ = tx.lock().unwrap().send(payload);
        });
        Self { rx: Mutex::new(rx) }
    }

    pub fn next(&self) -> T {
        self.rx
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(2))
            .expect("event not delivered")
    }
}
