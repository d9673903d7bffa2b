//! Engine configuration, loadable from TOML. Every section defaults
//! independently, so a partial file only overrides what it names.

mod cache_config;
pub mod defaults;
mod observability_config;
mod retrieval_config;
mod risk_config;
mod selection_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use cache_config::CacheConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use risk_config::RiskConfig;
pub use selection_config::SelectionConfig;

use crate::constants::MAX_RISK_LEVEL;
use crate::errors::{ConfigError, KairosResult};

/// Top-level configuration for the retrieval engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KairosConfig {
    pub selection: SelectionConfig,
    pub cache: CacheConfig,
    pub risk: RiskConfig,
    pub retrieval: RetrievalConfig,
    pub observability: ObservabilityConfig,
}

impl KairosConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(input: &str) -> KairosResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> KairosResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&raw)
    }

    /// Reject values the engine cannot operate with.
    pub fn validate(&self) -> KairosResult<()> {
        let s = &self.selection;
        if !(0.0..=1.0).contains(&s.min_reliability) {
            return Err(invalid("selection.min_reliability", "must be within [0, 1]"));
        }
        if s.reliability_weight < 0.0 || s.overlap_weight < 0.0 {
            return Err(invalid("selection weights", "must be non-negative"));
        }
        if s.reliability_weight + s.overlap_weight <= 0.0 {
            return Err(invalid("selection weights", "must not sum to zero"));
        }
        if self.cache.capacity_weight == 0 {
            return Err(invalid("cache.capacity_weight", "must be positive"));
        }
        if self.risk.decay_window_secs == 0 {
            return Err(invalid("risk.decay_window_secs", "must be positive"));
        }
        if self.risk.crisis_threshold > MAX_RISK_LEVEL {
            return Err(invalid("risk.crisis_threshold", "must be within 0..=5"));
        }
        if self.retrieval.fan_out_limit == 0 {
            return Err(invalid("retrieval.fan_out_limit", "must be positive"));
        }
        if self.retrieval.max_results == 0 {
            return Err(invalid("retrieval.max_results", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::errors::KairosError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
