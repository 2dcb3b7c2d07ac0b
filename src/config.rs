//! Service configuration
//!
//! All tunables of the aggregation core in one struct: the rotating API key
//! set, the upstream base location, refresh cadence, and the staleness
//! thresholds. Defaults mirror the values the service runs with in
//! production; the environment and CLI flags can override them.

use std::env;
use std::time::Duration;

/// Default upstream base URL
pub const DEFAULT_BASE_URL: &str = "https://api.cricapi.com/v1";

/// Background refresh cadence for the Current/Upcoming regions
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Minimum spacing between any two outbound upstream calls
const DEFAULT_THROTTLE_SPACING: Duration = Duration::from_secs(10);

/// How long a rate-limited API key stays out of rotation
const DEFAULT_KEY_COOLDOWN: Duration = Duration::from_secs(16 * 60);

/// Per-request timeout for upstream calls
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Staleness threshold for cached match detail
const DEFAULT_MATCH_DETAIL_TTL: Duration = Duration::from_secs(5 * 60);

/// Staleness threshold for the cached series list
const DEFAULT_SERIES_TTL: Duration = Duration::from_secs(5 * 60);

/// Environment variable holding comma-separated API keys
pub const API_KEYS_ENV: &str = "CRICFEED_API_KEYS";

/// Environment variable overriding the upstream base URL
pub const BASE_URL_ENV: &str = "CRICFEED_BASE_URL";

/// Environment variable overriding the refresh interval, in seconds
pub const REFRESH_INTERVAL_ENV: &str = "CRICFEED_REFRESH_INTERVAL_SECS";

/// Configuration for the aggregation service
#[derive(Debug, Clone)]
pub struct Config {
    /// Ordered set of rotating API keys; fixed after startup
    pub api_keys: Vec<String>,
    /// Upstream base URL
    pub base_url: String,
    /// Background cycle spacing for Current/Upcoming refreshes
    pub refresh_interval: Duration,
    /// Global minimum spacing between upstream calls
    pub throttle_spacing: Duration,
    /// Cooldown applied to a key after a rate-limit detection
    pub key_cooldown: Duration,
    /// Bounded timeout for each upstream request
    pub request_timeout: Duration,
    /// Staleness threshold for Match Detail entries
    pub match_detail_ttl: Duration,
    /// Staleness threshold for the Series region
    pub series_ttl: Duration,
    /// Maximum matches kept in the Current region
    pub current_cap: usize,
    /// Maximum matches kept in the Upcoming region
    pub upcoming_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            throttle_spacing: DEFAULT_THROTTLE_SPACING,
            key_cooldown: DEFAULT_KEY_COOLDOWN,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            match_detail_ttl: DEFAULT_MATCH_DETAIL_TTL,
            series_ttl: DEFAULT_SERIES_TTL,
            current_cap: 10,
            upcoming_cap: 20,
        }
    }
}

impl Config {
    /// Builds a configuration from defaults plus recognized environment
    /// variables (`CRICFEED_API_KEYS`, `CRICFEED_BASE_URL`,
    /// `CRICFEED_REFRESH_INTERVAL_SECS`). Unset or unparsable values fall
    /// back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(keys) = env::var(API_KEYS_ENV) {
            config.api_keys = parse_key_list(&keys);
        }
        if let Ok(url) = env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(secs) = env::var(REFRESH_INTERVAL_ENV) {
            if let Ok(secs) = secs.trim().parse::<u64>() {
                if secs > 0 {
                    config.refresh_interval = Duration::from_secs(secs);
                }
            }
        }

        config
    }
}

/// Splits a comma-separated key list, trimming whitespace and dropping
/// empty segments
pub fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
