//! Upstream cricket API client
//!
//! One bounded-timeout HTTP call to one endpoint with one API key, plus the
//! outcome classification callers apply. The provider wraps every response
//! in a `{status, reason?, data}` envelope; quota exhaustion arrives either
//! as HTTP 429 or as a failure reason naming the limit.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::FeedError;

/// The upstream read endpoints consumed by this core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Paged match list
    Matches,
    /// Series list
    Series,
    /// Single match info
    MatchInfo,
    /// Match squads
    MatchSquad,
    /// Match scorecard
    MatchScorecard,
    /// Alternately-named scorecard endpoint, tried when the primary one
    /// yields nothing
    MatchScorecardAlt,
}

impl Endpoint {
    /// URL path segment under the provider base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Matches => "matches",
            Endpoint::Series => "series",
            Endpoint::MatchInfo => "match_info",
            Endpoint::MatchSquad => "match_squad",
            Endpoint::MatchScorecard => "match_scorecard",
            Endpoint::MatchScorecardAlt => "match_scard",
        }
    }
}

/// Provider response envelope
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// "success" or "failure"
    pub status: String,
    /// Failure reason, present on failure
    #[serde(default)]
    pub reason: Option<String>,
    /// Endpoint payload, present on success
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// True when upstream declared success
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// True when a failure reason describes quota exhaustion
pub fn is_rate_limit_reason(reason: &str) -> bool {
    let reason = reason.to_lowercase();
    reason.contains("blocked") || reason.contains("limit") || reason.contains("exceeded")
}

/// The seam between the pipeline and the network. The refresh scheduler and
/// enricher only see this trait, so tests substitute a scripted fake.
#[async_trait]
pub trait ProviderApi: Send + Sync {
    /// Performs one call to `endpoint` with `params` using `api_key`,
    /// returning the decoded `data` payload on success.
    ///
    /// # Errors
    /// * `FeedError::RateLimited` — HTTP 429, or a failure reason naming
    ///   the quota ("blocked", "limit", "exceeded")
    /// * `FeedError::Upstream` — any other declared failure
    /// * `FeedError::Transport` / `FeedError::Decode` — transport or body
    ///   decoding problems; never auto-retried
    async fn call(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
        api_key: &str,
    ) -> Result<Value, FeedError>;
}

/// HTTP client for the hosted cricket data provider
#[derive(Debug, Clone)]
pub struct CricApiClient {
    /// Shared HTTP client; reuses connections across calls
    http: Client,
    /// Base URL, overridable for tests and self-hosted mirrors
    base_url: String,
}

impl CricApiClient {
    /// Creates a client with the given base URL and per-request timeout.
    ///
    /// # Errors
    /// Propagates `reqwest` builder failures (TLS backend initialization).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ProviderApi for CricApiClient {
    async fn call(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
        api_key: &str,
    ) -> Result<Value, FeedError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        let response = self
            .http
            .get(&url)
            .query(&[("apikey", api_key)])
            .query(params)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(FeedError::RateLimited("HTTP 429".to_string()));
        }

        let text = response.text().await?;
        let envelope: Envelope = serde_json::from_str(&text)?;

        if !envelope.is_success() {
            let reason = envelope
                .reason
                .unwrap_or_else(|| "unspecified failure".to_string());
            if is_rate_limit_reason(&reason) {
                return Err(FeedError::RateLimited(reason));
            }
            return Err(FeedError::Upstream(reason));
        }

        Ok(envelope.data.unwrap_or(Value::Null))
    }
}
