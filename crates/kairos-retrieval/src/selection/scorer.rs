//! Default relevance scorer: weighted reliability plus tag overlap.

use kairos_core::config::SelectionConfig;
use kairos_core::models::DataSource;
use kairos_core::traits::{IRelevanceScorer, RelevanceSignals};

/// `reliability_weight * reliability + overlap_weight * overlap_fraction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScorer {
    pub reliability_weight: f64,
    pub overlap_weight: f64,
}

impl WeightedScorer {
    pub fn new(reliability_weight: f64, overlap_weight: f64) -> Self {
        Self {
            reliability_weight,
            overlap_weight,
        }
    }

    pub fn from_config(config: &SelectionConfig) -> Self {
        Self::new(config.reliability_weight, config.overlap_weight)
    }
}

impl Default for WeightedScorer {
    fn default() -> Self {
        Self::from_config(&SelectionConfig::default())
    }
}

impl IRelevanceScorer for WeightedScorer {
    fn score(&self, source: &DataSource, signals: &RelevanceSignals) -> f64 {
        self.reliability_weight * source.reliability_score
            + self.overlap_weight * signals.overlap_fraction
    }

    fn name(&self) -> &str {
        "weighted"
    }
}
