//! Error taxonomy for the feed pipeline
//!
//! One crate-wide error enum because a single fetch flows through the key
//! pool, throttle gate, upstream client, and cache before a caller sees it.
//! Errors are absorbed at the refresh/enrich boundary and converted into
//! "serve best-available cached value"; they reach callers only when no
//! cached value exists at all.

use thiserror::Error;

/// Errors produced by the data aggregation core
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP transport failed (timeout, connection reset, DNS). Never
    /// auto-retried.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream rejected the call for quota reasons (HTTP 429 or a failure
    /// reason naming a rate limit). Triggers credential rotation.
    #[error("upstream rate limit hit: {0}")]
    RateLimited(String),

    /// Upstream declared failure for a non-rate-limit reason
    #[error("upstream reported failure: {0}")]
    Upstream(String),

    /// Response body was not the expected JSON envelope
    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Expected field absent from an otherwise successful payload
    #[error("missing expected field in response: {0}")]
    MissingField(String),

    /// No API keys configured; fatal at startup, never retried
    #[error("no API keys configured")]
    NoCredentials,

    /// Nothing cached and nothing fetchable for the requested region/id
    #[error("no data available for {0}")]
    NoData(String),
}

impl FeedError {
    /// Stable tag used to deduplicate repeated log lines for the same
    /// failure class (connection resets in particular arrive in bursts).
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::Transport(_) => "transport",
            FeedError::RateLimited(_) => "rate_limited",
            FeedError::Upstream(_) => "upstream",
            FeedError::Decode(_) => "decode",
            FeedError::MissingField(_) => "missing_field",
            FeedError::NoCredentials => "no_credentials",
            FeedError::NoData(_) => "no_data",
        }
    }

    /// True when rotating to another credential could help
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FeedError::RateLimited(_))
    }
}
