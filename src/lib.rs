//! Cricket match feed library
//!
//! The data-aggregation and caching core behind the application's read
//! surface: API key rotation under rate-limit pressure, global call
//! throttling, multi-region in-memory caching with staleness tolerance,
//! background refresh scheduling, and enrichment of match detail records
//! from several partial upstream responses.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod keypool;
pub mod refresh;
pub mod service;
pub mod throttle;

pub use config::Config;
pub use error::FeedError;
pub use service::{FeedStatus, MatchService};
