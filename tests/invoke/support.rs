//! Scripted transport: answers each call with the next step of a script.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use product_hub::invoke::{Transport, TransportError};
use product_hub::Envelope;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum Step {
    /// Answer with this envelope.
    Reply(Envelope),
    /// Fail at the transport level.
    Fail(String),
    /// Never answer.
    Hang,
}

impl Step {
    pub fn ok(data: Value) -> Self {
        Step::Reply(Envelope::ok(data))
    }

    pub fn remote_error(message: &str) -> Self {
        Step::Reply(Envelope::err(message))
    }
}

/// Plays `steps` in order; the last step repeats once the script runs out.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(step: Step) -> Self {
        Self::new(vec![step])
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().unwrap();
        if steps.len() > 1 {
            steps.pop_front().unwrap()
        } else {
            steps.front().cloned().unwrap_or(Step::Hang)
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn call(&self, function: &str, body: &Value) -> Result<Envelope, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((function.to_string(), body.clone()));
        match self.next_step() {
            Step::Reply(envelope) => Ok(envelope),
            Step::Fail(message) => Err(TransportError::new(message)),
            Step::Hang => std::future::pending().await,
        }
    }
}
