//! Bounded per-asset telemetry history.
//!
//! The id → window map is fixed when the store is built from the registry;
//! only the windows themselves change, each behind its own lock.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;

use crate::models::TelemetrySample;

pub const DEFAULT_WINDOW_CAPACITY: usize = 500;
pub const DEFAULT_QUERY_LIMIT: usize = 200;
pub const MAX_QUERY_LIMIT: usize = 10_000;

/// Clamp a caller-supplied limit into `[1, MAX_QUERY_LIMIT]`.
pub fn clamp_limit(limit: i64) -> usize {
    limit.clamp(1, MAX_QUERY_LIMIT as i64) as usize
}

#[derive(Debug)]
pub struct TelemetryStore {
    capacity: usize,
    windows: HashMap<String, RwLock<VecDeque<TelemetrySample>>>,
}

impl TelemetryStore {
    pub fn new<'a>(asset_ids: impl IntoIterator<Item = &'a str>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let windows = asset_ids
            .into_iter()
            .map(|id| (id.to_string(), RwLock::new(VecDeque::with_capacity(capacity))))
            .collect();

        Self { capacity, windows }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a sample, evicting the oldest one when the window is full.
    ///
    /// Returns `false` when the asset has no window. A sample older than the
    /// newest stored one is stored with the newest timestamp so the window
    /// stays ordered.
    pub fn append(&self, asset_id: &str, mut sample: TelemetrySample) -> bool {
        let Some(window) = self.windows.get(asset_id) else {
            return false;
        };

        let mut window = window.write();
        if let Some(last) = window.back() {
            if sample.timestamp < last.timestamp {
                sample.timestamp = last.timestamp;
            }
        }
        while window.len() >= self.capacity {
            window.pop_front();
        }
        window.push_back(sample);
        true
    }

    /// Last `limit` samples, oldest first. Unknown assets yield an empty vec.
    pub fn query(&self, asset_id: &str, limit: i64) -> Vec<TelemetrySample> {
        let Some(window) = self.windows.get(asset_id) else {
            return Vec::new();
        };

        let window = window.read();
        let take = clamp_limit(limit).min(window.len());
        window.iter().skip(window.len() - take).cloned().collect()
    }

    pub fn latest(&self, asset_id: &str) -> Option<TelemetrySample> {
        self.windows
            .get(asset_id)
            .and_then(|window| window.read().back().cloned())
    }

    pub fn len(&self, asset_id: &str) -> usize {
        self.windows
            .get(asset_id)
            .map(|window| window.read().len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn sample(second: i64) -> TelemetrySample {
        TelemetrySample {
            timestamp: Utc.with_ymd_and_hms(2025, 8, 14, 10, 0, 0).unwrap()
                + Duration::seconds(second),
            power: second as f64,
            efficiency: 44.0,
            emissions: 150.0,
        }
    }

    #[test]
    fn test_window_never_exceeds_capacity_and_evicts_oldest() {
        let store = TelemetryStore::new(["pp-001"], DEFAULT_WINDOW_CAPACITY);
        for i in 0..(DEFAULT_WINDOW_CAPACITY as i64 + 25) {
            assert!(store.append("pp-001", sample(i)));
            assert!(store.len("pp-001") <= DEFAULT_WINDOW_CAPACITY);
        }

        let all = store.query("pp-001", MAX_QUERY_LIMIT as i64);
        assert_eq!(all.len(), DEFAULT_WINDOW_CAPACITY);
        assert_eq!(all.first().map(|s| s.power), Some(25.0));
        assert_eq!(all.last().map(|s| s.power), Some(524.0));
    }

    #[test]
    fn test_query_returns_most_recent_oldest_first() {
        let store = TelemetryStore::new(["pp-001"], 10);
        for i in 0..6 {
            store.append("pp-001", sample(i));
        }

        let powers: Vec<f64> = store.query("pp-001", 3).iter().map(|s| s.power).collect();
        assert_eq!(powers, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_query_clamps_limit() {
        let store = TelemetryStore::new(["pp-001"], 10);
        for i in 0..4 {
            store.append("pp-001", sample(i));
        }

        assert_eq!(store.query("pp-001", 0).len(), 1);
        assert_eq!(store.query("pp-001", -50).len(), 1);
        assert_eq!(store.query("pp-001", 1_000_000).len(), 4);
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(20_000), MAX_QUERY_LIMIT);
        assert_eq!(clamp_limit(120), 120);
    }

    #[test]
    fn test_unknown_asset_is_empty_not_error() {
        let store = TelemetryStore::new(["pp-001"], 10);
        assert!(store.query("unknown-asset", 10).is_empty());
        assert!(store.latest("unknown-asset").is_none());
        assert!(!store.append("unknown-asset", sample(0)));
        assert_eq!(store.len("unknown-asset"), 0);
    }

    #[test]
    fn test_backwards_timestamp_is_held_at_newest() {
        let store = TelemetryStore::new(["pp-001"], 10);
        store.append("pp-001", sample(10));
        store.append("pp-001", sample(5));

        let series = store.query("pp-001", 10);
        assert_eq!(series[1].timestamp, series[0].timestamp);
        assert_eq!(series[1].power, 5.0);
    }

    #[test]
    fn test_latest_is_last_appended() {
        let store = TelemetryStore::new(["pp-001"], 10);
        assert!(store.latest("pp-001").is_none());
        store.append("pp-001", sample(1));
        store.append("pp-001", sample(2));
        assert_eq!(store.latest("pp-001").map(|s| s.power), Some(2.0));
    }
}
