//! Capacity invariant under arbitrary request sequences.

use std::sync::Arc;

use proptest::prelude::*;

use kairos_cache::ContentCache;
use kairos_core::config::CacheConfig;
use test_fixtures::{records, ScriptedFetcher};

proptest! {
    #[test]
    fn total_weight_never_exceeds_capacity(
        capacity in 1u64..40,
        ops in prop::collection::vec((0usize..6, 0usize..12, 1usize..15), 1..60),
    ) {
        let fetcher = Arc::new(ScriptedFetcher::new());
        for s in 0..6 {
            fetcher.set_records(&format!("s{s}"), records(&format!("s{s}"), s * 3));
        }
        let config = CacheConfig { ttl_secs: 86_400, capacity_weight: capacity };
        let cache = ContentCache::new(fetcher, &config);

        for (source, query, max) in ops {
            let content = cache.get_or_fetch(&format!("s{source}"), &format!("q{query}"), max).unwrap();
            prop_assert!(content.records.len() <= max);
            let stats = cache.stats();
            prop_assert!(stats.total_weight <= capacity);
            prop_assert!(stats.total_weight >= stats.entries as u64);
        }
    }

    #[test]
    fn repeated_request_is_served_from_cache(source in 0usize..6, max in 1usize..20) {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let config = CacheConfig { ttl_secs: 86_400, capacity_weight: 1_000 };
        let cache = ContentCache::new(fetcher.clone(), &config);
        let id = format!("s{source}");

        let first = cache.get_or_fetch(&id, "query", max).unwrap();
        let second = cache.get_or_fetch(&id, "QUERY", max).unwrap();
        prop_assert_eq!(first.records, second.records);
        prop_assert_eq!(fetcher.calls(), 1);
    }
}
