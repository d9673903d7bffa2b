//! ContentCache: the read-through front door to the content fetcher.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use kairos_core::config::CacheConfig;
use kairos_core::errors::FetchError;
use kairos_core::models::ResultRecord;
use kairos_core::traits::IContentFetcher;

use crate::entry::CacheEntry;
use crate::index::{Lookup, WeightedIndex};
use crate::inflight::{InFlight, SharedResult};
use crate::key::CacheKey;
use crate::stats::{CacheStats, Counters};

/// One read-through request.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    pub source_id: &'a str,
    pub query: &'a str,
    pub max_results: usize,
    /// Overrides the cache-wide TTL for an entry this request stores.
    pub ttl: Option<Duration>,
}

impl<'a> FetchRequest<'a> {
    pub fn new(source_id: &'a str, query: &'a str, max_results: usize) -> Self {
        Self {
            source_id,
            query,
            max_results,
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Where the records of a [`CachedContent`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    /// Served from a fresh entry.
    Cache,
    /// This caller ran the fetch.
    Fetched,
    /// This caller waited on a fetch another caller was already running.
    Collapsed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedContent {
    pub records: Vec<ResultRecord>,
    pub origin: ContentOrigin,
}

impl CachedContent {
    /// True unless this caller itself triggered a fetch.
    pub fn from_cache(&self) -> bool {
        self.origin != ContentOrigin::Fetched
    }
}

/// TTL + weighted-LRU cache over an [`IContentFetcher`].
///
/// Hits never take a cache-wide lock, and no lock is held across a fetch.
/// Concurrent misses on the same key collapse onto one fetch; its result, or
/// its error, is handed to every waiter. Errors are never stored.
pub struct ContentCache {
    fetcher: Arc<dyn IContentFetcher>,
    index: WeightedIndex,
    inflight: InFlight,
    default_ttl: Duration,
    counters: Counters,
}

impl ContentCache {
    pub fn new(fetcher: Arc<dyn IContentFetcher>, config: &CacheConfig) -> Self {
        Self {
            fetcher,
            index: WeightedIndex::new(config.capacity_weight),
            inflight: InFlight::default(),
            default_ttl: config.ttl(),
            counters: Counters::default(),
        }
    }

    /// Return up to `max_results` records for `query` from `source_id`,
    /// fetching on miss.
    pub fn get_or_fetch(
        &self,
        source_id: &str,
        query: &str,
        max_results: usize,
    ) -> Result<CachedContent, FetchError> {
        self.fetch_with(&FetchRequest::new(source_id, query, max_results), Utc::now())
    }

    /// [`get_or_fetch`](Self::get_or_fetch) with an explicit clock and an
    /// optional per-request TTL.
    pub fn fetch_with(
        &self,
        request: &FetchRequest<'_>,
        now: DateTime<Utc>,
    ) -> Result<CachedContent, FetchError> {
        let key = CacheKey::new(request.source_id, request.query);

        if let Some(records) = self.lookup(&key, request.max_results, now) {
            Counters::bump(&self.counters.hits);
            debug!(key = %key, records = records.len(), "content cache hit");
            return Ok(CachedContent {
                records: take(&records, request.max_results),
                origin: ContentOrigin::Cache,
            });
        }
        Counters::bump(&self.counters.misses);

        let guard = self.inflight.join(&key);
        let mut refilled = false;
        let (result, ran) = guard.resolve(|| {
            // A fetch that finished between our miss and joining the slot has
            // already stored its result.
            if let Some(records) = self.lookup(&key, request.max_results, now) {
                refilled = true;
                return Ok(records);
            }
            self.fetch_and_store(&key, request, now)
        });
        drop(guard);

        let origin = match (ran, refilled) {
            (false, _) => {
                Counters::bump(&self.counters.collapsed);
                debug!(key = %key, "joined in-flight fetch");
                ContentOrigin::Collapsed
            }
            (true, true) => ContentOrigin::Cache,
            (true, false) => ContentOrigin::Fetched,
        };

        result.map(|records| CachedContent {
            records: take(&records, request.max_results),
            origin,
        })
    }

    fn lookup(
        &self,
        key: &CacheKey,
        max_results: usize,
        now: DateTime<Utc>,
    ) -> Option<Arc<Vec<ResultRecord>>> {
        match self.index.lookup(key, now) {
            Lookup::Fresh(entry) if entry.covers(max_results) => Some(entry.records),
            Lookup::Fresh(_) | Lookup::Absent => None,
            Lookup::Expired => {
                Counters::bump(&self.counters.expirations);
                debug!(key = %key, "content cache entry expired");
                None
            }
        }
    }

    fn fetch_and_store(
        &self,
        key: &CacheKey,
        request: &FetchRequest<'_>,
        now: DateTime<Utc>,
    ) -> SharedResult {
        Counters::bump(&self.counters.fetches);
        let mut records = match self
            .fetcher
            .fetch(request.source_id, request.query, request.max_results)
        {
            Ok(records) => records,
            Err(err) => {
                Counters::bump(&self.counters.fetch_failures);
                warn!(source_id = %request.source_id, error = %err, "content fetch failed");
                return Err(err);
            }
        };
        records.truncate(request.max_results);
        let records = Arc::new(records);

        let ttl = request.ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(Arc::clone(&records), now, ttl, request.max_results);
        let weight = entry.size_weight;
        let outcome = self.index.insert(key.clone(), entry);

        if !outcome.evicted.is_empty() {
            Counters::add(&self.counters.evictions, outcome.evicted.len() as u64);
            debug!(key = %key, evicted = outcome.evicted.len(), "evicted least recently used entries");
        }
        if outcome.stored {
            debug!(key = %key, records = records.len(), weight, "content cached");
        } else {
            debug!(key = %key, weight, "entry exceeds cache capacity, not stored");
        }
        Ok(records)
    }

    /// Drop the entry for `(source_id, query)`. Returns whether one existed.
    pub fn invalidate(&self, source_id: &str, query: &str) -> bool {
        self.index
            .remove(&CacheKey::new(source_id, query))
            .is_some()
    }

    /// Drop every entry belonging to `source_id`.
    pub fn invalidate_source(&self, source_id: &str) -> usize {
        let removed = self
            .index
            .remove_where(|key, _| key.source_id() == source_id);
        if removed > 0 {
            debug!(%source_id, removed, "invalidated source entries");
        }
        removed
    }

    /// Remove every entry expired at `now`.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let removed = self
            .index
            .remove_where(|_, entry| entry.is_expired(now));
        Counters::add(&self.counters.expirations, removed as u64);
        removed
    }

    pub fn clear(&self) {
        self.index.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.index.len(),
            total_weight: self.index.total_weight(),
            capacity_weight: self.index.capacity(),
            ..self.counters.read()
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of fetches currently running.
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }
}

fn take(records: &[ResultRecord], max_results: usize) -> Vec<ResultRecord> {
    records.iter().take(max_results).cloned().collect()
}
