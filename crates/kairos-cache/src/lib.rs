//! # kairos-cache
//!
//! Content cache in front of the external fetcher.
//!
//! - TTL per entry, defaulting to `cache.ttl_secs`, overridable per source
//! - Weighted LRU: total entry weight never exceeds `cache.capacity_weight`
//! - At most one in-flight fetch per key; concurrent callers share its result
//! - Failures are shared with waiters but never cached

mod cache;
mod entry;
mod index;
mod inflight;
mod key;
mod stats;

pub use cache::{CachedContent, ContentCache, ContentOrigin, FetchRequest};
pub use entry::CacheEntry;
pub use key::{normalize_query, CacheKey};
pub use stats::CacheStats;
