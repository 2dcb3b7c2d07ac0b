//! In-memory cache store
//!
//! Four independent regions: Current Matches, Upcoming Matches, Series
//! List, and Match Detail keyed by match id. Every entry carries its fetch
//! timestamp and is served even when stale; staleness only decides whether
//! a refresh should be attempted, never whether a value is servable. A
//! failed refresh leaves the prior entry in place, so last-known-good wins
//! over errors. Nothing here survives a restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::data::{Match, MatchDetail};

/// A cached payload and the moment it was fetched
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub payload: T,
    /// When the payload was fetched from upstream
    pub fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Wraps a payload, stamping the fetch time as now
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            fetched_at: Utc::now(),
        }
    }

    /// Age of the entry
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.fetched_at
    }

    /// True once the entry is older than `ttl`. Stale entries stay
    /// servable; this only marks them eligible for a refresh attempt.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.age().to_std().map(|age| age > ttl).unwrap_or(false)
    }
}

/// The cache regions a refresh can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Current,
    Upcoming,
    Series,
}

/// Freshness and size of one region, for the diagnostic status query
#[derive(Debug, Clone, Serialize)]
pub struct RegionStatus {
    /// Number of cached items (list length, or detail map size)
    pub size: usize,
    /// Fetch time of the newest entry, absent when the region is empty
    pub fetched_at: Option<DateTime<Utc>>,
    /// Seconds since that fetch
    pub age_secs: Option<i64>,
}

/// Clears the region's busy flag when a refresh attempt finishes, on every
/// exit path including panics and cancelled futures
pub struct RefreshGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// The four-region in-memory store
#[derive(Debug, Default)]
pub struct CacheStore {
    current: RwLock<Option<CacheEntry<Vec<Match>>>>,
    upcoming: RwLock<Option<CacheEntry<Vec<Match>>>>,
    series: RwLock<Option<CacheEntry<Value>>>,
    detail: RwLock<HashMap<String, CacheEntry<MatchDetail>>>,
    current_busy: AtomicBool,
    upcoming_busy: AtomicBool,
    series_busy: AtomicBool,
}

impl CacheStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the refresh slot for a region. Returns `None` while another
    /// refresh of the same region is in flight; a concurrent trigger is a
    /// no-op, never queued.
    pub fn try_begin_refresh(&self, region: Region) -> Option<RefreshGuard<'_>> {
        let flag = match region {
            Region::Current => &self.current_busy,
            Region::Upcoming => &self.upcoming_busy,
            Region::Series => &self.series_busy,
        };
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| RefreshGuard { flag })
    }

    /// Current Matches region; the floor is an empty list, never an
    /// absent value
    pub async fn current(&self) -> Vec<Match> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|entry| entry.payload.clone())
            .unwrap_or_default()
    }

    /// Overwrites the Current region, stamping the fetch time
    pub async fn set_current(&self, matches: Vec<Match>) {
        *self.current.write().await = Some(CacheEntry::new(matches));
    }

    /// Upcoming Matches region; empty list floor
    pub async fn upcoming(&self) -> Vec<Match> {
        self.upcoming
            .read()
            .await
            .as_ref()
            .map(|entry| entry.payload.clone())
            .unwrap_or_default()
    }

    /// Overwrites the Upcoming region, stamping the fetch time
    pub async fn set_upcoming(&self, matches: Vec<Match>) {
        *self.upcoming.write().await = Some(CacheEntry::new(matches));
    }

    /// Series region entry with its age, regardless of staleness
    pub async fn series(&self) -> Option<CacheEntry<Value>> {
        self.series.read().await.clone()
    }

    /// Overwrites the Series region, stamping the fetch time
    pub async fn set_series(&self, payload: Value) {
        *self.series.write().await = Some(CacheEntry::new(payload));
    }

    /// Match Detail entry for `id` with its age, regardless of staleness
    pub async fn detail(&self, id: &str) -> Option<CacheEntry<MatchDetail>> {
        self.detail.read().await.get(id).cloned()
    }

    /// Stores a detail record for `id`, stamping the fetch time
    pub async fn set_detail(&self, id: &str, detail: MatchDetail) {
        self.detail
            .write()
            .await
            .insert(id.to_string(), CacheEntry::new(detail));
    }

    /// Rewinds a detail entry's fetch time, for staleness tests
    #[cfg(test)]
    pub(crate) async fn backdate_detail(&self, id: &str, age: chrono::Duration) {
        if let Some(entry) = self.detail.write().await.get_mut(id) {
            entry.fetched_at = Utc::now() - age;
        }
    }

    /// Rewinds the series entry's fetch time, for staleness tests
    #[cfg(test)]
    pub(crate) async fn backdate_series(&self, age: chrono::Duration) {
        if let Some(entry) = self.series.write().await.as_mut() {
            entry.fetched_at = Utc::now() - age;
        }
    }

    /// Per-region freshness and size for the diagnostic status query
    pub async fn status(&self) -> HashMap<&'static str, RegionStatus> {
        let mut report = HashMap::new();

        let current = self.current.read().await;
        report.insert("current", list_status(current.as_ref()));
        drop(current);

        let upcoming = self.upcoming.read().await;
        report.insert("upcoming", list_status(upcoming.as_ref()));
        drop(upcoming);

        let series = self.series.read().await;
        report.insert(
            "series",
            RegionStatus {
                size: usize::from(series.is_some()),
                fetched_at: series.as_ref().map(|e| e.fetched_at),
                age_secs: series.as_ref().map(|e| e.age().num_seconds()),
            },
        );
        drop(series);

        let detail = self.detail.read().await;
        let newest = detail.values().map(|e| e.fetched_at).max();
        report.insert(
            "detail",
            RegionStatus {
                size: detail.len(),
                fetched_at: newest,
                age_secs: newest.map(|t| (Utc::now() - t).num_seconds()),
            },
        );

        report
    }
}

fn list_status(entry: Option<&CacheEntry<Vec<Match>>>) -> RegionStatus {
    RegionStatus {
        size: entry.map(|e| e.payload.len()).unwrap_or(0),
        fetched_at: entry.map(|e| e.fetched_at),
        age_secs: entry.map(|e| e.age().num_seconds()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InningsScore;

    fn sample_match(id: &str) -> Match {
        Match {
            id: id.to_string(),
            name: "A vs B".to_string(),
            teams: vec!["A".to_string(), "B".to_string()],
            started: true,
            ended: false,
            date_time: None,
            score: vec![InningsScore {
                runs: 10,
                wickets: 0,
                overs: 2.0,
                inning: "A Inning 1".to_string(),
            }],
            status: None,
            venue: None,
        }
    }

    #[tokio::test]
    async fn test_empty_list_regions_return_empty_not_absent() {
        let store = CacheStore::new();
        assert!(store.current().await.is_empty());
        assert!(store.upcoming().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_overwrites_and_stamps() {
        let store = CacheStore::new();
        store.set_current(vec![sample_match("m1")]).await;
        store.set_current(vec![sample_match("m2")]).await;

        let current = store.current().await;
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, "m2");
    }

    #[tokio::test]
    async fn test_detail_preserved_per_id() {
        let store = CacheStore::new();
        let detail = MatchDetail::bare(sample_match("m1"));
        store.set_detail("m1", detail).await;

        assert!(store.detail("m1").await.is_some());
        assert!(store.detail("m2").await.is_none());
    }

    #[tokio::test]
    async fn test_busy_flag_rejects_concurrent_refresh() {
        let store = CacheStore::new();
        let guard = store.try_begin_refresh(Region::Current);
        assert!(guard.is_some());
        assert!(store.try_begin_refresh(Region::Current).is_none());

        // Other regions are independent.
        assert!(store.try_begin_refresh(Region::Upcoming).is_some());

        drop(guard);
        assert!(store.try_begin_refresh(Region::Current).is_some());
    }

    #[tokio::test]
    async fn test_stale_entry_still_served() {
        let store = CacheStore::new();
        store.set_series(serde_json::json!({"series": []})).await;

        let mut entry = store.series().await.expect("entry");
        entry.fetched_at = Utc::now() - chrono::Duration::minutes(30);
        assert!(entry.is_stale(Duration::from_secs(300)));
        // Staleness never removes the value; reading still succeeds.
        assert!(store.series().await.is_some());
    }

    #[test]
    fn test_entry_freshness_window() {
        let entry = CacheEntry::new(42);
        assert!(!entry.is_stale(Duration::from_secs(60)));

        let old = CacheEntry {
            payload: 42,
            fetched_at: Utc::now() - chrono::Duration::minutes(10),
        };
        assert!(old.is_stale(Duration::from_secs(300)));
        assert!(!old.is_stale(Duration::from_secs(3600)));
    }

    #[tokio::test]
    async fn test_status_reports_sizes_and_ages() {
        let store = CacheStore::new();
        store
            .set_current(vec![sample_match("m1"), sample_match("m2")])
            .await;
        store
            .set_detail("m1", MatchDetail::bare(sample_match("m1")))
            .await;

        let status = store.status().await;
        assert_eq!(status["current"].size, 2);
        assert!(status["current"].fetched_at.is_some());
        assert_eq!(status["upcoming"].size, 0);
        assert!(status["upcoming"].fetched_at.is_none());
        assert_eq!(status["series"].size, 0);
        assert_eq!(status["detail"].size, 1);
    }
}
