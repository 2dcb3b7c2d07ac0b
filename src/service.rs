//! Public query surface over the cached match feed
//!
//! The four read operations and the diagnostic status query consumed by
//! the application's route layer. Reads are cache-first: the pipeline only
//! runs when a region is empty or past its staleness threshold, and every
//! failure is absorbed into "serve the best available cached value." A
//! caller sees an error only on a true cold start with nothing cached.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheStore, RegionStatus};
use crate::config::Config;
use crate::data::enrich;
use crate::data::provider::{CricApiClient, ProviderApi};
use crate::data::{CombinedMatches, Match, MatchDetail};
use crate::error::FeedError;
use crate::keypool::{KeyPool, KeyStatus};
use crate::refresh::{self, LogGate, RefreshHandle, LOG_DEDUP_WINDOW};
use crate::throttle::ThrottleGate;

/// Shared state behind the service: the explicit context object injected
/// into the refresh and enrichment pipelines. Created at startup, dropped
/// at shutdown; nothing lives in module globals.
pub(crate) struct ServiceInner {
    pub(crate) config: Config,
    pub(crate) provider: Arc<dyn ProviderApi>,
    pub(crate) keys: Mutex<KeyPool>,
    pub(crate) throttle: ThrottleGate,
    pub(crate) cache: CacheStore,
    pub(crate) log_gate: LogGate,
}

/// Throttle timing for the diagnostic status query
#[derive(Debug, Clone, Serialize)]
pub struct ThrottleStatus {
    /// Configured spacing between upstream calls
    pub spacing_secs: u64,
    /// Seconds since the last upstream call started, absent before the
    /// first call
    pub last_call_secs_ago: Option<u64>,
}

/// Diagnostic snapshot for an operational surface, not end users
#[derive(Debug, Clone, Serialize)]
pub struct FeedStatus {
    /// Freshness and size per cache region
    pub regions: HashMap<&'static str, RegionStatus>,
    /// Block state per API key
    pub keys: Vec<KeyStatus>,
    /// Throttle gate timing
    pub throttle: ThrottleStatus,
}

/// The match feed service
#[derive(Clone)]
pub struct MatchService {
    inner: Arc<ServiceInner>,
}

impl MatchService {
    /// Creates a service talking to the real upstream provider.
    ///
    /// # Errors
    /// `FeedError::NoCredentials` when no API keys are configured, or a
    /// transport error from HTTP client construction.
    pub fn new(config: Config) -> Result<Self, FeedError> {
        let provider = Arc::new(CricApiClient::new(&config.base_url, config.request_timeout)?);
        Self::with_provider(config, provider)
    }

    /// Creates a service over any `ProviderApi` implementation. Used by
    /// tests to substitute a scripted upstream, and by collaborators that
    /// wrap the client.
    ///
    /// # Errors
    /// `FeedError::NoCredentials` when no API keys are configured.
    pub fn with_provider(
        config: Config,
        provider: Arc<dyn ProviderApi>,
    ) -> Result<Self, FeedError> {
        let keys = KeyPool::new(config.api_keys.clone(), config.key_cooldown)?;
        let throttle = ThrottleGate::new(config.throttle_spacing);
        Ok(Self {
            inner: Arc::new(ServiceInner {
                provider,
                keys: Mutex::new(keys),
                throttle,
                cache: CacheStore::new(),
                log_gate: LogGate::new(LOG_DEDUP_WINDOW),
                config,
            }),
        })
    }

    /// Live matches. Served from cache when non-empty; otherwise one
    /// on-demand refresh runs first. The floor is an empty list.
    pub async fn current_matches(&self) -> Vec<Match> {
        let cached = self.inner.cache.current().await;
        if !cached.is_empty() {
            return cached;
        }
        refresh::refresh_current(&self.inner).await;
        self.inner.cache.current().await
    }

    /// Upcoming matches, same cache-first policy as `current_matches`
    pub async fn upcoming_matches(&self) -> Vec<Match> {
        let cached = self.inner.cache.upcoming().await;
        if !cached.is_empty() {
            return cached;
        }
        refresh::refresh_upcoming(&self.inner).await;
        self.inner.cache.upcoming().await
    }

    /// Both lists, refreshed concurrently when needed. Either half failing
    /// degrades to an empty list for that half.
    pub async fn all_matches(&self) -> CombinedMatches {
        let (live, upcoming) =
            futures::future::join(self.current_matches(), self.upcoming_matches()).await;
        CombinedMatches { live, upcoming }
    }

    /// The series list payload, cache-first with the configured staleness
    /// threshold.
    ///
    /// # Errors
    /// Only when the fetch fails and nothing was ever cached.
    pub async fn series_list(&self) -> Result<Value, FeedError> {
        if let Some(entry) = self.inner.cache.series().await {
            if !entry.is_stale(self.inner.config.series_ttl) {
                return Ok(entry.payload);
            }
        }
        match refresh::refresh_series(&self.inner).await {
            Ok(data) => Ok(data),
            Err(err) => match self.inner.cache.series().await {
                Some(entry) => {
                    debug!(error = %err, "series refresh failed, serving last-known-good");
                    Ok(entry.payload)
                }
                None => Err(err),
            },
        }
    }

    /// Consolidated detail for one match, built by the enricher.
    ///
    /// # Errors
    /// Only on a true cold miss: nothing cached for `id` and the
    /// match-info fetch failed.
    pub async fn match_details(&self, id: &str) -> Result<MatchDetail, FeedError> {
        enrich::match_details(&self.inner, id).await
    }

    /// Diagnostic snapshot: cache freshness, key block states, throttle
    /// timing
    pub async fn status(&self) -> FeedStatus {
        let regions = self.inner.cache.status().await;
        let keys = self.inner.keys.lock().await.statuses();
        let throttle = ThrottleStatus {
            spacing_secs: self.inner.throttle.spacing().as_secs(),
            last_call_secs_ago: self
                .inner
                .throttle
                .last_call_age()
                .await
                .map(|age| age.as_secs()),
        };
        FeedStatus {
            regions,
            keys,
            throttle,
        }
    }

    /// Starts the background refresh loop for the list regions
    pub fn spawn_refresh(&self) -> RefreshHandle {
        refresh::spawn(Arc::clone(&self.inner))
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &ServiceInner {
        &self.inner
    }
}
