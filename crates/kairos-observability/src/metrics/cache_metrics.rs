//! Last observed content cache counters.

use serde::{Deserialize, Serialize};

/// Snapshot of the content cache, refreshed after each retrieval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub fetches: u64,
    pub fetch_failures: u64,
    pub collapsed_waits: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub entries: usize,
    pub total_weight: u64,
    pub capacity_weight: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64
    }

    /// Occupied share of the weight capacity, in [0, 1].
    pub fn utilization(&self) -> f64 {
        if self.capacity_weight == 0 {
            return 0.0;
        }
        self.total_weight as f64 / self.capacity_weight as f64
    }

    /// Fetches saved by collapsing concurrent misses.
    pub fn fetches_saved(&self) -> u64 {
        self.collapsed_waits
    }
}
