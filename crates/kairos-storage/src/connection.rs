//! The single connection behind a mutex, with its pragmas.
//!
//! WAL mode, NORMAL sync, 5s busy_timeout.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rusqlite::Connection;

use kairos_core::errors::PersistenceError;

use crate::to_persistence_err;

/// Apply performance and safety pragmas to a connection.
pub fn apply_pragmas(conn: &Connection) -> Result<(), PersistenceError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(to_persistence_err)
}

/// Serialized access to one SQLite connection.
pub struct SerializedConnection {
    conn: Mutex<Connection>,
}

impl SerializedConnection {
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path).map_err(|e| PersistenceError::Unavailable {
            reason: format!("cannot open {}: {e}", path.display()),
        })?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory().map_err(to_persistence_err)?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&Connection) -> Result<T, PersistenceError>,
    {
        // A panic mid-statement leaves SQLite itself consistent.
        let guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}
