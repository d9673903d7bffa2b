//! Selection ordering and determinism over arbitrary catalogs.

use std::sync::Arc;

use proptest::prelude::*;

use kairos_core::config::SelectionConfig;
use kairos_core::models::{DataSource, SourceType};
use kairos_registry::SourceRegistry;
use kairos_retrieval::RelevanceSelector;

const TAGS: [&str; 6] = ["anxiety", "depression", "trauma", "grief", "crisis", "all"];

fn tag_set() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(TAGS.to_vec(), 0..4)
        .prop_map(|tags| tags.into_iter().map(String::from).collect())
}

fn catalog() -> impl Strategy<Value = Vec<DataSource>> {
    prop::collection::vec((0u32..=100, tag_set(), tag_set(), any::<bool>()), 0..30).prop_map(
        |entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (rel, specs, approaches, active))| {
                    let source = DataSource::new(
                        format!("s{i:02}"),
                        format!("Source {i}"),
                        SourceType::Guideline,
                        f64::from(rel) / 100.0,
                    )
                    .with_specializations(specs)
                    .with_approaches(approaches);
                    if active {
                        source
                    } else {
                        source.inactive()
                    }
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn selection_is_sorted_filtered_and_deterministic(
        sources in catalog(),
        specs in tag_set(),
        approaches in tag_set(),
        min_rel in 0u32..=100,
    ) {
        let min_reliability = f64::from(min_rel) / 100.0;
        let registry = Arc::new(SourceRegistry::with_sources(sources).unwrap());
        let selector = RelevanceSelector::from_config(registry, &SelectionConfig::default());

        let first = selector.select(&specs, &approaches, min_reliability);
        let second = selector.select(&specs, &approaches, min_reliability);
        prop_assert_eq!(&first, &second);

        for pair in first.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.score > b.score || (a.score == b.score && a.source.id < b.source.id),
                "{} ({}) ranked before {} ({})", a.source.id, a.score, b.source.id, b.score
            );
        }
        for scored in &first {
            prop_assert!(scored.source.is_active);
            prop_assert!(scored.source.reliability_score >= min_reliability);
            prop_assert!(scored.signals.matched_tags > 0);
            prop_assert!(scored.signals.overlap_fraction <= 1.0);
        }
        if specs.is_empty() && approaches.is_empty() {
            prop_assert!(first.is_empty());
        }
    }
}
