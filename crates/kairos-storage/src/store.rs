use std::path::Path;

use tracing::debug;

use kairos_core::errors::PersistenceError;
use kairos_core::models::RiskEvent;
use kairos_core::traits::IRiskEventStore;

use crate::connection::SerializedConnection;
use crate::migrations;
use crate::queries::risk_event_ops;

/// Durable risk-event log in a SQLite database.
pub struct SqliteRiskEventStore {
    conn: SerializedConnection,
}

impl SqliteRiskEventStore {
    /// Open (or create) the database at `path` and bring its schema up to
    /// date.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        let store = Self {
            conn: SerializedConnection::open(path)?,
        };
        store.conn.with_conn(migrations::run_migrations)?;
        Ok(store)
    }

    /// A private in-memory database.
    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        let store = Self {
            conn: SerializedConnection::open_in_memory()?,
        };
        store.conn.with_conn(migrations::run_migrations)?;
        Ok(store)
    }

    pub fn schema_version(&self) -> Result<u32, PersistenceError> {
        self.conn.with_conn(migrations::current_version)
    }

    pub fn event_count(&self) -> Result<u64, PersistenceError> {
        self.conn.with_conn(risk_event_ops::count_events)
    }
}

impl IRiskEventStore for SqliteRiskEventStore {
    fn put(&self, event: &RiskEvent) -> Result<(), PersistenceError> {
        let seq = self
            .conn
            .with_conn(|conn| risk_event_ops::insert_event(conn, event))?;
        debug!(session_id = %event.session_id, seq, "risk event persisted");
        Ok(())
    }

    fn get_history(&self, session_id: &str) -> Result<Vec<RiskEvent>, PersistenceError> {
        self.conn
            .with_conn(|conn| risk_event_ops::events_for_session(conn, session_id))
    }
}
