use crate::models::DataSource;

/// Inputs a relevance scorer may use beyond the source itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceSignals {
    /// Matched tags divided by requested tags, in [0, 1].
    pub overlap_fraction: f64,
    pub matched_tags: usize,
    pub requested_tags: usize,
}

/// Pluggable relevance scoring. Must be pure: identical inputs give
/// identical scores, so selection order stays deterministic.
pub trait IRelevanceScorer: Send + Sync {
    fn score(&self, source: &DataSource, signals: &RelevanceSignals) -> f64;

    fn name(&self) -> &str;
}
