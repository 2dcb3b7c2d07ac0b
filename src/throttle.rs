//! Global upstream call throttle
//!
//! One shared gate in front of every outbound upstream call, regardless of
//! endpoint or API key. `wait` enforces a fixed minimum spacing since the
//! last recorded call start, which caps the aggregate call rate the
//! provider sees from this process.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Serializes upstream traffic to at most one call per spacing interval
#[derive(Debug)]
pub struct ThrottleGate {
    spacing: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl ThrottleGate {
    /// Creates a gate with the given minimum spacing between calls
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last_call: Mutex::new(None),
        }
    }

    /// Suspends until the spacing since the last call start has elapsed,
    /// then records "now" as the new last call start before returning.
    ///
    /// The lock is held across the sleep on purpose: concurrent waiters
    /// queue up behind it, so each one observes the timestamp written by
    /// the previous caller and no two callers can claim the same slot.
    pub async fn wait(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            tokio::time::sleep_until(prev + self.spacing).await;
        }
        *last = Some(Instant::now());
    }

    /// Time since the last recorded call start, for the diagnostic status
    pub async fn last_call_age(&self) -> Option<Duration> {
        let last = self.last_call.lock().await;
        last.map(|prev| Instant::now() - prev)
    }

    /// Configured spacing between calls
    pub fn spacing(&self) -> Duration {
        self.spacing
    }
}
