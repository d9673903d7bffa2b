use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use kairos_core::config::RiskConfig;
use kairos_core::errors::KairosResult;
use kairos_core::models::{RiskAssessment, RiskEvent, RiskLevel, RiskSource};
use kairos_core::traits::IRiskEventStore;

use crate::decay::{self, DecayPolicy};

/// Derives each session's risk level from its stored event log.
///
/// Holds no per-session state of its own: every evaluation reads the full
/// history, so concurrent recorders and evaluators need no coordination
/// beyond what the store provides.
pub struct RiskStateMachine {
    store: Arc<dyn IRiskEventStore>,
    config: RiskConfig,
}

impl RiskStateMachine {
    pub fn new(store: Arc<dyn IRiskEventStore>, config: RiskConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    fn policy(&self) -> DecayPolicy {
        DecayPolicy::new(self.config.decay_window(), self.config.critical_sticky)
    }

    /// Append an event to its session's log.
    pub fn record(&self, event: RiskEvent) -> KairosResult<()> {
        self.store.put(&event)?;
        if event.level >= RiskLevel::High {
            warn!(
                session_id = %event.session_id,
                level = %event.level,
                source = event.source.as_str(),
                "high risk signal recorded"
            );
        } else {
            debug!(
                session_id = %event.session_id,
                level = %event.level,
                source = event.source.as_str(),
                "risk signal recorded"
            );
        }
        Ok(())
    }

    /// Record a score on the 0-10 assessment scale. Returns the mapped level.
    pub fn record_ten_point(
        &self,
        session_id: &str,
        score: u8,
        observed_at: DateTime<Utc>,
        source: RiskSource,
    ) -> KairosResult<RiskLevel> {
        let level = RiskLevel::from_ten_point_scale(score)?;
        self.record(RiskEvent::new(session_id, level, observed_at, source))?;
        Ok(level)
    }

    /// Current level and trend of `session_id` as of `now`.
    ///
    /// Fails closed: a store failure is returned as an error, never read as
    /// an empty history.
    pub fn evaluate(&self, session_id: &str, now: DateTime<Utc>) -> KairosResult<RiskAssessment> {
        let history = self.store.get_history(session_id)?;
        let policy = self.policy();
        let level = decay::level_at(&history, now, policy);
        let trend = decay::trend_at(&history, now, policy);

        if level == RiskLevel::Critical {
            info!(%session_id, events = history.len(), "session at critical risk");
        }
        Ok(RiskAssessment {
            session_id: session_id.to_string(),
            level,
            trend,
            evaluated_at: now,
            event_count: history.iter().filter(|e| e.observed_at <= now).count(),
        })
    }

    /// [`evaluate`](Self::evaluate) against the wall clock.
    pub fn evaluate_now(&self, session_id: &str) -> KairosResult<RiskAssessment> {
        self.evaluate(session_id, Utc::now())
    }

    /// The session's raw event log in arrival order.
    pub fn history(&self, session_id: &str) -> KairosResult<Vec<RiskEvent>> {
        Ok(self.store.get_history(session_id)?)
    }
}
