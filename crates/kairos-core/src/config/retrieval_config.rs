use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Maximum number of selected sources fetched per request.
    pub fan_out_limit: usize,
    /// Default number of records requested from each source.
    pub max_results: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            fan_out_limit: defaults::DEFAULT_FAN_OUT_LIMIT,
            max_results: defaults::DEFAULT_MAX_RESULTS,
        }
    }
}
