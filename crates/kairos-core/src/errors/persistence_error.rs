/// Risk-event store errors.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("risk event store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("corrupt risk event for session {session_id}: {details}")]
    CorruptEvent { session_id: String, details: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },
}
