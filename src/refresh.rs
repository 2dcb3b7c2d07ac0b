//! Background refresh scheduling and the shared fetch pipeline
//!
//! Every upstream fetch runs through one pipeline: acquire an API key,
//! wait on the global throttle gate, call the provider, and on a
//! rate-limit classification rotate to the next key and retry — bounded to
//! one attempt per configured key, never an unbounded loop. A background
//! timer refreshes the Current and Upcoming regions; cycles are skipped
//! outright while every key is cooling down. Failed refreshes keep the
//! prior cached value and log at most once per window per error class.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::cache::Region;
use crate::data::matches::{current_bucket, extract_match_list, normalize_match, upcoming_bucket};
use crate::data::provider::Endpoint;
use crate::data::Match;
use crate::error::FeedError;
use crate::service::ServiceInner;

/// Delay before the initial refresh after startup
const STARTUP_DELAY: Duration = Duration::from_secs(2);

/// Minimum spacing between repeated log lines for one error class
pub(crate) const LOG_DEDUP_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Deduplicates error logging: one line per distinct error key per window.
/// Connection resets arrive in bursts during upstream incidents; the first
/// one is worth a line, the next hundred are not.
#[derive(Debug)]
pub(crate) struct LogGate {
    window: Duration,
    seen: Mutex<HashMap<String, Instant>>,
}

impl LogGate {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// True when `key` has not been logged within the window; records it
    pub(crate) async fn allow(&self, key: &str) -> bool {
        let mut seen = self.seen.lock().await;
        let now = Instant::now();
        match seen.get(key) {
            Some(&last) if now - last < self.window => false,
            _ => {
                seen.insert(key.to_string(), now);
                true
            }
        }
    }

    /// Logs a refresh failure, deduplicated per operation and error class
    pub(crate) async fn log_error(&self, op: &'static str, err: &FeedError) {
        let key = format!("{op}:{}", err.kind());
        if self.allow(&key).await {
            error!(op, error = %err, "refresh failed, keeping prior cached value");
        }
    }
}

/// One fetch through the full pipeline: key acquisition, throttle wait,
/// provider call, and rate-limit rotation bounded by the pool size.
///
/// # Errors
/// Transport and upstream failures return after the first attempt; they
/// are never auto-retried. A rate-limited result rotates keys until every
/// configured key has been tried once, then returns the last rate-limit
/// error.
pub(crate) async fn fetch_with_rotation(
    inner: &ServiceInner,
    endpoint: Endpoint,
    params: &[(&str, &str)],
) -> Result<Value, FeedError> {
    let attempts = inner.keys.lock().await.len();
    let mut last_rate_limit = None;

    for _ in 0..attempts {
        let token = inner.keys.lock().await.acquire();
        inner.throttle.wait().await;
        match inner.provider.call(endpoint, params, &token).await {
            Err(FeedError::RateLimited(reason)) => {
                warn!(
                    endpoint = endpoint.path(),
                    %reason,
                    "API key rate limited, rotating to next key"
                );
                inner.keys.lock().await.mark_rate_limited(&token);
                last_rate_limit = Some(FeedError::RateLimited(reason));
            }
            outcome => return outcome,
        }
    }

    Err(last_rate_limit.unwrap_or(FeedError::NoCredentials))
}

/// Fetches the match list and rebuilds the Current region. A concurrent
/// trigger while a refresh is in flight is a no-op; failures keep the
/// prior value.
pub(crate) async fn refresh_current(inner: &ServiceInner) {
    let Some(_guard) = inner.cache.try_begin_refresh(Region::Current) else {
        return;
    };
    match fetch_matches(inner).await {
        Ok(matches) => {
            let scanned = matches.len();
            let current = current_bucket(matches, inner.config.current_cap);
            info!(region = "current", kept = current.len(), scanned, "region refreshed");
            inner.cache.set_current(current).await;
        }
        Err(err) => inner.log_gate.log_error("refresh_current", &err).await,
    }
}

/// Fetches the match list and rebuilds the Upcoming region; same guard
/// and failure policy as the Current refresh
pub(crate) async fn refresh_upcoming(inner: &ServiceInner) {
    let Some(_guard) = inner.cache.try_begin_refresh(Region::Upcoming) else {
        return;
    };
    match fetch_matches(inner).await {
        Ok(matches) => {
            let scanned = matches.len();
            let upcoming = upcoming_bucket(matches, inner.config.upcoming_cap);
            info!(region = "upcoming", kept = upcoming.len(), scanned, "region refreshed");
            inner.cache.set_upcoming(upcoming).await;
        }
        Err(err) => inner.log_gate.log_error("refresh_upcoming", &err).await,
    }
}

async fn fetch_matches(inner: &ServiceInner) -> Result<Vec<Match>, FeedError> {
    let data = fetch_with_rotation(inner, Endpoint::Matches, &[("offset", "0")]).await?;
    Ok(extract_match_list(&data)
        .iter()
        .filter_map(normalize_match)
        .collect())
}

/// Refreshes the Series region and returns the fresh payload.
///
/// # Errors
/// Returns the fetch error for the caller to fall back on its cached
/// value; returns `FeedError::NoData` when a concurrent refresh holds the
/// region and nothing is cached yet.
pub(crate) async fn refresh_series(inner: &ServiceInner) -> Result<Value, FeedError> {
    let Some(_guard) = inner.cache.try_begin_refresh(Region::Series) else {
        return match inner.cache.series().await {
            Some(entry) => Ok(entry.payload),
            None => Err(FeedError::NoData("series".to_string())),
        };
    };
    match fetch_with_rotation(inner, Endpoint::Series, &[("offset", "0")]).await {
        Ok(data) => {
            info!(region = "series", "region refreshed");
            inner.cache.set_series(data.clone()).await;
            Ok(data)
        }
        Err(err) => {
            inner.log_gate.log_error("refresh_series", &err).await;
            Err(err)
        }
    }
}

/// One timer cycle: refresh Current and Upcoming concurrently, unless the
/// whole key pool is cooling down, in which case the cycle is skipped
/// without touching the gate.
pub(crate) async fn run_cycle(inner: &ServiceInner) {
    if inner.keys.lock().await.all_blocked() {
        debug!("skipping refresh cycle, every API key is cooling down");
        return;
    }
    futures::future::join(refresh_current(inner), refresh_upcoming(inner)).await;
}

/// Handle for the background refresh task
pub struct RefreshHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Stops the background refresh loop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Spawns the background refresh loop: an initial refresh shortly after
/// startup, then one cycle per configured interval until shutdown
pub(crate) fn spawn(inner: Arc<ServiceInner>) -> RefreshHandle {
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
    let interval_period = inner.config.refresh_interval;

    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(STARTUP_DELAY) => {}
            _ = shutdown_rx.recv() => return,
        }
        run_cycle(&inner).await;

        let mut interval = tokio::time::interval(interval_period);
        // The first tick fires immediately; the startup refresh already ran.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => run_cycle(&inner).await,
                _ = shutdown_rx.recv() => break,
            }
        }
    });

    RefreshHandle { shutdown_tx }
}
