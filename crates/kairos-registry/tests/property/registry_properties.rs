use kairos_core::models::{DataSource, SourceType};
use kairos_registry::{Catalog, SourceFilter, SourceRegistry};
use proptest::prelude::*;

fn arb_source() -> impl Strategy<Value = DataSource> {
    ("[a-z]{1,8}", 0.0f64..=1.0, any::<bool>()).prop_map(|(id, reliability, active)| {
        let s = DataSource::new(id.clone(), id, SourceType::Guideline, reliability);
        if active {
            s
        } else {
            s.inactive()
        }
    })
}

fn dedup_by_id(mut sources: Vec<DataSource>) -> Vec<DataSource> {
    let mut seen = std::collections::HashSet::new();
    sources.retain(|s| seen.insert(s.id.clone()));
    sources
}

proptest! {
    #[test]
    fn listing_is_sorted_by_id(sources in prop::collection::vec(arb_source(), 0..30)) {
        let registry = SourceRegistry::new();
        registry.load(Catalog::new(dedup_by_id(sources))).unwrap();
        let ids = registry.list(SourceFilter::all()).ids();
        let mut sorted = ids.clone();
        sorted.sort();
        prop_assert_eq!(ids, sorted);
    }

    #[test]
    fn active_listing_is_subset_of_all(sources in prop::collection::vec(arb_source(), 0..30)) {
        let registry = SourceRegistry::new();
        registry.load(Catalog::new(dedup_by_id(sources))).unwrap();
        let all = registry.list(SourceFilter::all()).ids();
        for id in registry.list(SourceFilter::active()).ids() {
            prop_assert!(all.contains(&id));
            prop_assert!(registry.get(&id).unwrap().is_active);
        }
    }
}
