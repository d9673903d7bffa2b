//! Recency-stamped entry index with explicit weight accounting.
//!
//! Lookups only take the map shard holding their key and bump an atomic
//! recency stamp, so a hit never waits on an insert or eviction elsewhere.
//! Inserts, evictions and bulk removals serialize on a writer lock, which is
//! what keeps `total_weight <= capacity`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::entry::CacheEntry;
use crate::key::CacheKey;

pub(crate) enum Lookup {
    Fresh(CacheEntry),
    /// The entry was past its TTL and has been dropped.
    Expired,
    Absent,
}

/// What an insert did to the index.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct InsertOutcome {
    pub stored: bool,
    pub evicted: Vec<CacheKey>,
}

struct Stamped {
    entry: CacheEntry,
    last_used: AtomicU64,
}

pub(crate) struct WeightedIndex {
    entries: DashMap<CacheKey, Stamped>,
    clock: AtomicU64,
    /// Only grows under `writer`; shrinks whenever a removal succeeds.
    total_weight: AtomicU64,
    capacity: u64,
    writer: Mutex<()>,
}

impl WeightedIndex {
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: DashMap::new(),
            clock: AtomicU64::new(0),
            total_weight: AtomicU64::new(0),
            capacity,
            writer: Mutex::new(()),
        }
    }

    /// Fresh entries are stamped most recently used. Expired entries are
    /// removed on the spot.
    pub fn lookup(&self, key: &CacheKey, now: DateTime<Utc>) -> Lookup {
        match self.entries.get(key) {
            None => return Lookup::Absent,
            Some(stamped) if !stamped.entry.is_expired(now) => {
                stamped.last_used.store(self.tick(), Ordering::Relaxed);
                return Lookup::Fresh(stamped.entry.clone());
            }
            Some(_) => {}
        }
        match self.entries.remove_if(key, |_, s| s.entry.is_expired(now)) {
            Some((_, stamped)) => {
                self.release_weight(stamped.entry.size_weight);
                Lookup::Expired
            }
            // Replaced by a fresh entry or removed by someone else meanwhile.
            None => Lookup::Absent,
        }
    }

    /// Store `entry` under `key`, replacing any previous entry, then evict
    /// least recently used entries until the new one fits.
    ///
    /// The key being inserted is never chosen as a victim. An entry heavier
    /// than the whole capacity is not stored and evicts nothing.
    pub fn insert(&self, key: CacheKey, entry: CacheEntry) -> InsertOutcome {
        let _writer = self.lock_writer();
        let mut outcome = InsertOutcome::default();
        self.remove_entry(&key);
        if entry.size_weight > self.capacity {
            return outcome;
        }

        while self.total_weight() + entry.size_weight > self.capacity {
            match self.least_recent() {
                Some(victim) => {
                    if self.remove_entry(&victim).is_some() {
                        outcome.evicted.push(victim);
                    }
                }
                None => break,
            }
        }

        self.total_weight
            .fetch_add(entry.size_weight, Ordering::AcqRel);
        let stamped = Stamped {
            entry,
            last_used: AtomicU64::new(self.tick()),
        };
        if let Some(previous) = self.entries.insert(key, stamped) {
            self.release_weight(previous.entry.size_weight);
        }
        outcome.stored = true;
        outcome
    }

    pub fn remove(&self, key: &CacheKey) -> Option<CacheEntry> {
        let _writer = self.lock_writer();
        self.remove_entry(key)
    }

    /// Remove every entry whose key satisfies `pred`. Returns how many went.
    pub fn remove_where(&self, pred: impl Fn(&CacheKey, &CacheEntry) -> bool) -> usize {
        let _writer = self.lock_writer();
        let doomed: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|e| pred(e.key(), &e.value().entry))
            .map(|e| e.key().clone())
            .collect();
        doomed
            .iter()
            .filter(|key| self.remove_entry(key).is_some())
            .count()
    }

    pub fn clear(&self) {
        self.remove_where(|_, _| true);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Held by every mutation that may grow or rebalance the index.
    pub(crate) fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove_entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        let (_, stamped) = self.entries.remove(key)?;
        self.release_weight(stamped.entry.size_weight);
        Some(stamped.entry)
    }

    fn least_recent(&self) -> Option<CacheKey> {
        self.entries
            .iter()
            .min_by_key(|e| e.value().last_used.load(Ordering::Relaxed))
            .map(|e| e.key().clone())
    }

    fn release_weight(&self, weight: u64) {
        self.total_weight.fetch_sub(weight, Ordering::AcqRel);
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Keys from most to least recently used.
    #[cfg(test)]
    pub fn keys_mru(&self) -> Vec<CacheKey> {
        let mut stamped: Vec<(u64, CacheKey)> = self
            .entries
            .iter()
            .map(|e| (e.value().last_used.load(Ordering::Relaxed), e.key().clone()))
            .collect();
        stamped.sort_by(|a, b| b.0.cmp(&a.0));
        stamped.into_iter().map(|(_, k)| k).collect()
    }
}
