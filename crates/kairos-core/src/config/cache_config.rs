use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Content cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Default time-to-live for cached content (seconds). Sources may override.
    pub ttl_secs: u64,
    /// Maximum total size weight held by the cache.
    pub capacity_weight: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
            capacity_weight: defaults::DEFAULT_CACHE_CAPACITY_WEIGHT,
        }
    }
}
