//! Central metrics registry.
//!
//! [`MetricsCollector`] owns the domain-specific metric collectors and
//! provides a unified interface for recording and querying metrics.

pub mod cache_metrics;
pub mod retrieval_metrics;

pub use cache_metrics::CacheMetrics;
pub use retrieval_metrics::RetrievalMetrics;

/// Central metrics registry that owns all domain-specific collectors.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MetricsCollector {
    pub retrieval: RetrievalMetrics,
    pub cache: CacheMetrics,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all metrics (useful for testing or periodic rotation).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Serialize every collector for export.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
