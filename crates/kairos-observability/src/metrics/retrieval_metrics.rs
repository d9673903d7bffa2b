//! Request outcomes, per-source failure counts, crisis widenings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tracks retrieval outcomes across requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalMetrics {
    pub requests: u64,
    /// Requests that returned content with every fetched source succeeding.
    pub complete: u64,
    /// Requests that returned content despite at least one source failing.
    pub partial_failures: u64,
    /// Requests that failed with no content.
    pub total_failures: u64,
    /// Requests where no source qualified.
    pub empty_selections: u64,
    pub crisis_widenings: u64,
    pub records_served: u64,
    /// Records dropped as duplicates of a higher-ranked source's content.
    pub duplicates_dropped: u64,
    pub failures_by_source: BTreeMap<String, u64>,
}

impl RetrievalMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished request.
    pub fn record_request(&mut self, records_served: usize, failed_sources: usize, crisis_widened: bool) {
        self.requests += 1;
        self.records_served += records_served as u64;
        if failed_sources > 0 {
            self.partial_failures += 1;
        } else {
            self.complete += 1;
        }
        if crisis_widened {
            self.crisis_widenings += 1;
        }
    }

    /// Record a request that ended in `NoContentAvailable`.
    pub fn record_total_failure(&mut self, crisis_widened: bool) {
        self.requests += 1;
        self.total_failures += 1;
        if crisis_widened {
            self.crisis_widenings += 1;
        }
    }

    pub fn record_empty_selection(&mut self) {
        self.requests += 1;
        self.empty_selections += 1;
    }

    pub fn record_source_failure(&mut self, source_id: &str) {
        *self.failures_by_source.entry(source_id.to_string()).or_default() += 1;
    }

    pub fn record_duplicates(&mut self, dropped: usize) {
        self.duplicates_dropped += dropped as u64;
    }

    /// Fraction of requests that produced no content because every source failed.
    pub fn total_failure_rate(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        self.total_failures as f64 / self.requests as f64
    }

    /// Sources ordered by failure count, most failing first, ties by id.
    pub fn least_reliable_sources(&self, limit: usize) -> Vec<(String, u64)> {
        let mut sources: Vec<(String, u64)> = self
            .failures_by_source
            .iter()
            .map(|(id, n)| (id.clone(), *n))
            .collect();
        sources.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sources.truncate(limit);
        sources
    }
}
