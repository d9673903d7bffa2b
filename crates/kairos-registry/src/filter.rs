//! Source predicates and lazy, restartable listings.

use std::sync::Arc;

use kairos_core::models::{normalize_tag, AccessTier, DataSource, SourceType};

use crate::registry::CatalogSnapshot;

/// Conjunction of optional predicates over a source. The default matches
/// every source, active or not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFilter {
    pub active_only: bool,
    pub source_type: Option<SourceType>,
    pub tier: Option<AccessTier>,
    pub specialization: Option<String>,
    pub approach: Option<String>,
    pub min_reliability: Option<f64>,
}

impl SourceFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn active() -> Self {
        Self {
            active_only: true,
            ..Self::default()
        }
    }

    pub fn of_type(mut self, source_type: SourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    pub fn with_tier(mut self, tier: AccessTier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Sources covering this specialization (wildcard sources included).
    pub fn with_specialization(mut self, tag: &str) -> Self {
        self.specialization = Some(normalize_tag(tag));
        self
    }

    /// Sources covering this approach (wildcard sources included).
    pub fn with_approach(mut self, tag: &str) -> Self {
        self.approach = Some(normalize_tag(tag));
        self
    }

    pub fn with_min_reliability(mut self, min: f64) -> Self {
        self.min_reliability = Some(min);
        self
    }

    pub fn matches(&self, source: &DataSource) -> bool {
        if self.active_only && !source.is_active {
            return false;
        }
        if self.source_type.is_some_and(|t| t != source.source_type) {
            return false;
        }
        if self.tier.is_some_and(|t| t != source.access.tier) {
            return false;
        }
        if let Some(tag) = &self.specialization {
            if !source.matches_specialization(tag) {
                return false;
            }
        }
        if let Some(tag) = &self.approach {
            if !source.matches_approach(tag) {
                return false;
            }
        }
        if let Some(min) = self.min_reliability {
            if source.reliability_score < min {
                return false;
            }
        }
        true
    }
}

/// Sources of one catalog snapshot matching a filter, ordered by id.
///
/// Holds the snapshot it was created from, so a concurrent reload never
/// changes what an existing listing yields. Iterate as many times as needed.
#[derive(Debug, Clone)]
pub struct SourceListing {
    snapshot: Arc<CatalogSnapshot>,
    filter: SourceFilter,
}

impl SourceListing {
    pub(crate) fn new(snapshot: Arc<CatalogSnapshot>, filter: SourceFilter) -> Self {
        Self { snapshot, filter }
    }

    /// Lazily yield matching sources in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &DataSource> + '_ {
        self.snapshot
            .sources()
            .filter(move |source| self.filter.matches(source))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn ids(&self) -> Vec<String> {
        self.iter().map(|s| s.id.clone()).collect()
    }

    /// Catalog version this listing reads from.
    pub fn version(&self) -> u64 {
        self.snapshot.version()
    }
}

impl<'a> IntoIterator for &'a SourceListing {
    type Item = &'a DataSource;
    type IntoIter = Box<dyn Iterator<Item = &'a DataSource> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
