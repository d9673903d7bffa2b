//! # kairos-storage
//!
//! SQLite-backed implementation of the risk-event persistence capability.
//! One serialized connection, schema migrations tracked in `user_version`,
//! and per-session arrival order preserved by an autoincrement sequence.

pub mod connection;
pub mod migrations;
pub mod queries;
mod store;

pub use store::SqliteRiskEventStore;

use kairos_core::errors::PersistenceError;

/// Map a rusqlite failure into the persistence error the capability exposes.
pub(crate) fn to_persistence_err(e: rusqlite::Error) -> PersistenceError {
    PersistenceError::SqliteError {
        message: e.to_string(),
    }
}
