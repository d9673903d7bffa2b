use crate::errors::PersistenceError;
use crate::models::RiskEvent;

/// Append-only persistence for risk events.
pub trait IRiskEventStore: Send + Sync {
    /// Append an event to its session's log.
    fn put(&self, event: &RiskEvent) -> Result<(), PersistenceError>;

    /// All events for a session, in arrival order. Unknown sessions yield an
    /// empty history, not an error.
    fn get_history(&self, session_id: &str) -> Result<Vec<RiskEvent>, PersistenceError>;
}
