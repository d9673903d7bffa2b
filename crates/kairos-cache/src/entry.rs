use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use kairos_core::models::ResultRecord;

/// One cached fetch result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub records: Arc<Vec<ResultRecord>>,
    pub fetched_at: DateTime<Utc>,
    pub ttl: Duration,
    /// Capacity units charged for this entry: the record count, at least 1.
    pub size_weight: u64,
    /// `max_results` the fetch was issued with.
    pub fetched_limit: usize,
}

impl CacheEntry {
    pub fn new(
        records: Arc<Vec<ResultRecord>>,
        fetched_at: DateTime<Utc>,
        ttl: Duration,
        fetched_limit: usize,
    ) -> Self {
        let size_weight = weight_of(&records);
        Self {
            records,
            fetched_at,
            ttl,
            size_weight,
            fetched_limit,
        }
    }

    /// Expired once `now - fetched_at >= ttl`. An entry stamped in the future
    /// is treated as fresh.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        (now - self.fetched_at)
            .to_std()
            .is_ok_and(|age| age >= self.ttl)
    }

    /// Whether this entry can answer a request for `max_results` records.
    ///
    /// A fetch that came back short of its limit holds everything the source
    /// had, so it covers any request. A full fetch may have been truncated
    /// and only covers requests up to its limit.
    pub fn covers(&self, max_results: usize) -> bool {
        self.records.len() < self.fetched_limit || max_results <= self.fetched_limit
    }
}

pub(crate) fn weight_of(records: &[ResultRecord]) -> u64 {
    records.len().max(1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize, limit: usize) -> CacheEntry {
        let records = (0..n)
            .map(|i| ResultRecord::new(format!("t{i}"), "b"))
            .collect::<Vec<_>>();
        CacheEntry::new(
            Arc::new(records),
            DateTime::<Utc>::UNIX_EPOCH,
            Duration::from_secs(60),
            limit,
        )
    }

    #[test]
    fn empty_result_still_weighs_one() {
        assert_eq!(entry(0, 5).size_weight, 1);
        assert_eq!(entry(4, 5).size_weight, 4);
    }

    #[test]
    fn expiry_is_inclusive_of_ttl() {
        let e = entry(1, 5);
        let t0 = e.fetched_at;
        assert!(!e.is_expired(t0 + chrono::Duration::seconds(59)));
        assert!(e.is_expired(t0 + chrono::Duration::seconds(60)));
        assert!(!e.is_expired(t0 - chrono::Duration::seconds(10)));
    }

    #[test]
    fn short_fetch_covers_larger_requests() {
        assert!(entry(2, 5).covers(50));
        assert!(entry(5, 5).covers(5));
        assert!(!entry(5, 5).covers(6));
    }
}
