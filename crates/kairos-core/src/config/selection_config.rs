use serde::{Deserialize, Serialize};

use super::defaults;

/// Relevance selector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Minimum reliability score a source needs to be selected.
    pub min_reliability: f64,
    /// Weight of the source reliability in the relevance score.
    pub reliability_weight: f64,
    /// Weight of the tag-overlap fraction in the relevance score.
    pub overlap_weight: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_reliability: defaults::DEFAULT_MIN_RELIABILITY,
            reliability_weight: defaults::DEFAULT_RELIABILITY_WEIGHT,
            overlap_weight: defaults::DEFAULT_OVERLAP_WEIGHT,
        }
    }
}
