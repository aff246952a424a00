//! Event bus: typed topics over an explicitly shared emitter.
//!
//! The bus is a plain value: construct it once, pass clones to whoever
//! publishes or subscribes. There is no process-wide instance.
//!
//! ```ignore
//! let bus = EventBus::new();
//! let subscription = bus.subscribe::<ProductSaved, _>(|event| {
//!     println!("saved {}", event.product_id);
//! });
//! bus.publish::<ProductSaved>(ProductSaved { product_id: "P1".into(), .. });
//! subscription.unsubscribe();
//! ```
//!
//! Delivery is asynchronous: listeners run off the publishing task.

mod topics;

use std::sync::{Arc, Mutex};

use event_emitter_rs::EventEmitter;
use serde::{de::DeserializeOwned, Serialize};

pub use topics::{ArtifactStored, MetricsReplaced, ProductSaved};

/// A named channel with a fixed payload type.
pub trait Topic {
    const NAME: &'static str;
    type Payload: Serialize + DeserializeOwned + Send + 'static;
}

/// Cloneable handle to a shared emitter.
#[derive(Clone)]
pub struct EventBus {
    emitter: Arc<Mutex<EventEmitter>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    /// Register `listener` for topic `T`. Keep the returned handle to
    /// unsubscribe later.
    pub fn subscribe<T, F>(&self, listener: F) -> Subscription
    where
        T: Topic,
        F: Fn(T::Payload) + Send + Sync + 'static,
    {
        let id = match self.emitter.lock() {
            Ok(mut emitter) => emitter.on(T::NAME, listener),
            Err(_) => {
                tracing::error!(topic = T::NAME, "event bus lock poisoned, listener not registered");
                String::new()
            }
        };
        Subscription {
            topic: T::NAME,
            id,
            emitter: Arc::clone(&self.emitter),
        }
    }

    /// Deliver `payload` to every listener of `T`.
    pub fn publish<T: Topic>(&self, payload: T::Payload) {
        match self.emitter.lock() {
            Ok(mut emitter) => {
                tracing::debug!(topic = T::NAME, "publishing event");
                emitter.emit(T::NAME, payload);
            }
            Err(_) => tracing::error!(topic = T::NAME, "event bus lock poisoned, event dropped"),
        }
    }
}

/// Handle to one registered listener.
pub struct Subscription {
    topic: &'static str,
    id: String,
    emitter: Arc<Mutex<EventEmitter>>,
}

impl Subscription {
    pub fn topic(&self) -> &'static str {
        self.topic
    }

    /// Remove the listener. Returns whether it was still registered.
    pub fn unsubscribe(self) -> bool {
        if self.id.is_empty() {
            return false;
        }
        match self.emitter.lock() {
            Ok(mut emitter) => emitter.remove_listener(&self.id).is_some(),
            Err(_) => false,
        }
    }
}
