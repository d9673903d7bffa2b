//! Catalog composition and reliability distribution.

use std::collections::BTreeMap;

use serde::Serialize;

use kairos_core::models::{DataSource, SourceType};

/// Reliability buckets, highest first. Lower bound inclusive.
pub const RELIABILITY_BUCKETS: [(&str, f64); 6] = [
    ("0.9-1.0", 0.9),
    ("0.8-0.9", 0.8),
    ("0.7-0.8", 0.7),
    ("0.6-0.7", 0.6),
    ("0.5-0.6", 0.5),
    ("0.0-0.5", f64::NEG_INFINITY),
];

/// Snapshot statistics over every catalogued source, active or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceStatistics {
    pub total_sources: usize,
    pub active_sources: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_specialization: BTreeMap<String, usize>,
    pub by_approach: BTreeMap<String, usize>,
    pub reliability_distribution: BTreeMap<String, usize>,
}

impl SourceStatistics {
    pub fn compute<'a>(sources: impl Iterator<Item = &'a DataSource>) -> Self {
        let mut stats = Self::default();
        for t in SourceType::ALL {
            stats.by_type.insert(t.as_str().to_string(), 0);
        }
        for (bucket, _) in RELIABILITY_BUCKETS {
            stats.reliability_distribution.insert(bucket.to_string(), 0);
        }

        for source in sources {
            stats.total_sources += 1;
            if source.is_active {
                stats.active_sources += 1;
            }
            *stats
                .by_type
                .entry(source.source_type.as_str().to_string())
                .or_default() += 1;
            for tag in &source.specializations {
                *stats.by_specialization.entry(tag.clone()).or_default() += 1;
            }
            for tag in &source.approaches {
                *stats.by_approach.entry(tag.clone()).or_default() += 1;
            }
            let bucket = reliability_bucket(source.reliability_score);
            *stats
                .reliability_distribution
                .entry(bucket.to_string())
                .or_default() += 1;
        }
        stats
    }
}

/// Bucket label for a reliability score.
pub fn reliability_bucket(score: f64) -> &'static str {
    RELIABILITY_BUCKETS
        .iter()
        .find(|(_, lower)| score >= *lower)
        .map(|(label, _)| *label)
        .unwrap_or("0.0-0.5")
}
