//! Single-owner cache for population-level tracking statistics.
//!
//! The broader system refreshes a "current stats" baseline on a timer and
//! reads it far more often than it refreshes. That cross-call state lives
//! here as an explicit struct with a refresh-on-read contract, owned by a
//! single component rather than a hidden module-level singleton. Safe for
//! single-threaded polling; wrap it in a lock only if it must be shared.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Snapshot of the tracked-population statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TrackingStats {
    pub total_objects: usize,
    pub active_risks: usize,
    pub risk_score: u32,
    pub predicted_events: usize,
}

/// Refresh-on-read stats cache with an explicit last-fetch timestamp.
#[derive(Clone, Debug)]
pub struct StatsCache {
    /// Fallback served until the first successful fetch.
    baseline: TrackingStats,
    cached: Option<TrackingStats>,
    last_fetch: Option<DateTime<Utc>>,
    refresh_interval: Duration,
}

impl StatsCache {
    pub fn new(baseline: TrackingStats, refresh_interval: Duration) -> Self {
        Self {
            baseline,
            cached: None,
            last_fetch: None,
            refresh_interval,
        }
    }

    /// The configured fallback snapshot.
    pub fn baseline(&self) -> TrackingStats {
        self.baseline
    }

    /// When the cache last refreshed, if ever.
    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.last_fetch
    }

    /// True when a read at `now` would trigger a refetch.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.last_fetch {
            None => true,
            Some(fetched) => now - fetched >= self.refresh_interval,
        }
    }

    /// Read the current stats, refetching first if the refresh interval
    /// has elapsed.
    ///
    /// `fetch` is only invoked when a refresh is due; between refreshes
    /// reads are served from the cache (or the baseline before the first
    /// fetch succeeds).
    pub fn get_or_refresh<F>(&mut self, now: DateTime<Utc>, fetch: F) -> TrackingStats
    where
        F: FnOnce() -> TrackingStats,
    {
        if self.needs_refresh(now) {
            self.cached = Some(fetch());
            self.last_fetch = Some(now);
        }
        self.cached.unwrap_or(self.baseline)
    }

    /// Drop the cached snapshot so the next read refetches.
    pub fn invalidate(&mut self) {
        self.cached = None;
        self.last_fetch = None;
    }
}
