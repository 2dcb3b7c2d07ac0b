//! Command-line interface parsing
//!
//! Subcommands map one-to-one onto the service's read operations, plus a
//! `watch` mode that runs the background refresh loop. Keys and tunables
//! come from the environment with flag overrides.

use clap::{Parser, Subcommand};
use std::time::Duration;

use crate::config::{parse_key_list, Config};

/// Cricket match feed - cached reads over a rate-limited upstream API
#[derive(Parser, Debug)]
#[command(name = "cricfeed")]
#[command(about = "Cricket match data aggregation and caching service")]
#[command(version)]
pub struct Cli {
    /// API key(s) for the upstream provider; repeatable, or one
    /// comma-separated value. Falls back to CRICFEED_API_KEYS.
    #[arg(long = "key", value_name = "KEY", global = true)]
    pub keys: Vec<String>,

    /// Upstream base URL override
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Background refresh interval in seconds (watch mode)
    #[arg(long, value_name = "SECS", global = true)]
    pub refresh_interval: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// The operations exposed on the command line
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print live matches
    Current,
    /// Print upcoming matches
    Upcoming,
    /// Print live and upcoming matches together
    All,
    /// Print enriched detail for one match
    Detail {
        /// Upstream match id
        id: String,
    },
    /// Print the cached series list
    Series,
    /// Print cache, key pool, and throttle diagnostics
    Status,
    /// Run the background refresh loop until interrupted
    Watch,
}

impl Cli {
    /// Builds the service configuration: environment first, then flag
    /// overrides on top.
    pub fn to_config(&self) -> Config {
        let mut config = Config::from_env();

        if !self.keys.is_empty() {
            config.api_keys = self
                .keys
                .iter()
                .flat_map(|value| parse_key_list(value))
                .collect();
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = self.refresh_interval {
            if secs > 0 {
                config.refresh_interval = Duration::from_secs(secs);
            }
        }

        config
    }
}
