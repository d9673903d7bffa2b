use serde::{Deserialize, Serialize};

use super::defaults;

/// Risk state machine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Length of one decay step (seconds). Each full window without a new
    /// event lowers the level by one.
    pub decay_window_secs: u64,
    /// When true, CRITICAL never decays until an explicit lower assessment.
    pub critical_sticky: bool,
    /// Risk level at or above which crisis sources are force-included.
    pub crisis_threshold: u8,
}

impl RiskConfig {
    pub fn decay_window(&self) -> chrono::Duration {
        // chrono caps durations at i64::MAX milliseconds.
        let secs = i64::try_from(self.decay_window_secs).unwrap_or(i64::MAX);
        chrono::Duration::seconds(secs.min(i64::MAX / 1_000))
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            decay_window_secs: defaults::DEFAULT_DECAY_WINDOW_SECS,
            critical_sticky: defaults::DEFAULT_CRITICAL_STICKY,
            crisis_threshold: defaults::DEFAULT_CRISIS_THRESHOLD,
        }
    }
}
