//! Retry and timeout knobs for one remote function call.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Growth factor applied to the retry delay after every failed attempt.
pub const BACKOFF_FACTOR: f64 = 1.5;

/// Retry/timeout policy for a single `invoke`.
///
/// Field names follow the wire/config spelling (`retries`, `retryDelay`,
/// `timeoutMs`) so a policy can be written in TOML or passed along with a
/// request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvokeOptions {
    /// Attempts allowed, including the first one.
    pub retries: u32,
    /// Base backoff in milliseconds.
    #[serde(alias = "retryDelayMs")]
    pub retry_delay: u64,
    /// Per-attempt deadline in milliseconds. Zero disables the deadline.
    pub timeout_ms: u64,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay: 1000,
            timeout_ms: 30_000,
        }
    }
}

impl InvokeOptions {
    /// Preset for reads: more attempts, shorter deadline.
    pub fn read() -> Self {
        Self {
            retries: 3,
            retry_delay: 1000,
            timeout_ms: 15_000,
        }
    }

    /// Preset for writes and deletes. A retried write may duplicate its side
    /// effects, so it gets fewer attempts and a longer deadline.
    pub fn write() -> Self {
        Self {
            retries: 2,
            retry_delay: 2000,
            timeout_ms: 30_000,
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay.as_millis() as u64;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Attempts actually made; a zero budget still gets one attempt.
    pub fn attempts(&self) -> u32 {
        self.retries.max(1)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    /// Delay to wait after failed attempt `attempt` (1-based):
    /// `retry_delay × 1.5^(attempt-1)`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.retry_delay as f64 * BACKOFF_FACTOR.powi(exponent);
        Duration::from_millis(millis.round() as u64)
    }

    /// Total backoff slept by a call that fails every one of its attempts.
    pub fn total_backoff(&self) -> Duration {
        (1..self.attempts()).map(|attempt| self.backoff(attempt)).sum()
    }
}

/// The policies `Invoker::read` and `Invoker::write` apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvokePresets {
    pub read: InvokeOptions,
    pub write: InvokeOptions,
}

impl Default for InvokePresets {
    fn default() -> Self {
        Self {
            read: InvokeOptions::read(),
            write: InvokeOptions::write(),
        }
    }
}
