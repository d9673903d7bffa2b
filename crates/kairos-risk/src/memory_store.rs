use dashmap::DashMap;

use kairos_core::errors::PersistenceError;
use kairos_core::models::RiskEvent;
use kairos_core::traits::IRiskEventStore;

/// Process-local risk event log. Appends for one session are serialized by
/// the map's shard lock, so history is returned in arrival order.
#[derive(Debug, Default)]
pub struct InMemoryRiskStore {
    logs: DashMap<String, Vec<RiskEvent>>,
}

impl InMemoryRiskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions with at least one event.
    pub fn session_count(&self) -> usize {
        self.logs.len()
    }
}

impl IRiskEventStore for InMemoryRiskStore {
    fn put(&self, event: &RiskEvent) -> Result<(), PersistenceError> {
        self.logs
            .entry(event.session_id.clone())
            .or_default()
            .push(event.clone());
        Ok(())
    }

    fn get_history(&self, session_id: &str) -> Result<Vec<RiskEvent>, PersistenceError> {
        Ok(self
            .logs
            .get(session_id)
            .map(|log| log.clone())
            .unwrap_or_default())
    }
}
