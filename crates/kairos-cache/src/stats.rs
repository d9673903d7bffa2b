use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::json;

/// Point-in-time cache counters and occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Calls actually made to the fetcher.
    pub fetches: u64,
    pub fetch_failures: u64,
    /// Callers that waited on another caller's in-flight fetch.
    pub collapsed: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub entries: usize,
    pub total_weight: u64,
    pub capacity_weight: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "hits": self.hits,
            "misses": self.misses,
            "hit_rate": self.hit_rate(),
            "fetches": self.fetches,
            "fetch_failures": self.fetch_failures,
            "collapsed": self.collapsed,
            "evictions": self.evictions,
            "expirations": self.expirations,
            "entries": self.entries,
            "total_weight": self.total_weight,
            "capacity_weight": self.capacity_weight,
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub fetches: AtomicU64,
    pub fetch_failures: AtomicU64,
    pub collapsed: AtomicU64,
    pub evictions: AtomicU64,
    pub expirations: AtomicU64,
}

impl Counters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub fn read(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            collapsed: self.collapsed.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            ..CacheStats::default()
        }
    }
}
