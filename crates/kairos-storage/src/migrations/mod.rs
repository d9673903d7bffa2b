//! Schema migrations using PRAGMA user_version.

pub mod v001_risk_events;

use rusqlite::Connection;
use tracing::info;

use kairos_core::errors::PersistenceError;

/// Latest schema version this build knows how to create.
pub const LATEST_VERSION: u32 = 1;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), PersistenceError> {
    let current = current_version(conn)?;

    let migrations: &[(&str, u32)] = &[(v001_risk_events::MIGRATION_SQL, 1)];

    for (sql, version) in migrations {
        if current < *version {
            conn.execute_batch(sql)
                .map_err(|e| PersistenceError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| PersistenceError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
            info!(version, "applied migration");
        }
    }
    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, PersistenceError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| PersistenceError::MigrationFailed {
            version: 0,
            reason: e.to_string(),
        })
}
