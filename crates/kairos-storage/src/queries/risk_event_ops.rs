//! Row-level operations on `risk_events`.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use kairos_core::errors::PersistenceError;
use kairos_core::models::{RiskEvent, RiskLevel, RiskSource};

use crate::to_persistence_err;

/// Append one event. Returns its sequence number.
pub fn insert_event(conn: &Connection, event: &RiskEvent) -> Result<i64, PersistenceError> {
    conn.execute(
        "INSERT INTO risk_events (session_id, level, observed_at, source)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            event.session_id,
            event.level.as_u8(),
            event.observed_at.to_rfc3339(),
            event.source.as_str(),
        ],
    )
    .map_err(to_persistence_err)?;
    Ok(conn.last_insert_rowid())
}

/// A session's events in arrival order.
pub fn events_for_session(
    conn: &Connection,
    session_id: &str,
) -> Result<Vec<RiskEvent>, PersistenceError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT level, observed_at, source FROM risk_events
             WHERE session_id = ?1 ORDER BY seq ASC",
        )
        .map_err(to_persistence_err)?;

    let rows = stmt
        .query_map(params![session_id], |row| {
            Ok((
                row.get::<_, u8>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(to_persistence_err)?;

    let mut events = Vec::new();
    for row in rows {
        let (level, observed_at, source) = row.map_err(to_persistence_err)?;
        events.push(decode(session_id, level, &observed_at, &source)?);
    }
    Ok(events)
}

/// Number of stored events across all sessions.
pub fn count_events(conn: &Connection) -> Result<u64, PersistenceError> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM risk_events", [], |row| row.get(0))
        .map_err(to_persistence_err)?;
    Ok(u64::try_from(count).unwrap_or(0))
}

fn decode(
    session_id: &str,
    level: u8,
    observed_at: &str,
    source: &str,
) -> Result<RiskEvent, PersistenceError> {
    let corrupt = |details: String| PersistenceError::CorruptEvent {
        session_id: session_id.to_string(),
        details,
    };

    let level = RiskLevel::try_from(level).map_err(|e| corrupt(e.to_string()))?;
    let observed_at = DateTime::parse_from_rfc3339(observed_at)
        .map_err(|e| corrupt(format!("bad timestamp {observed_at:?}: {e}")))?
        .with_timezone(&Utc);
    let source = match source {
        "explicit-assessment" => RiskSource::ExplicitAssessment,
        "inferred" => RiskSource::Inferred,
        other => return Err(corrupt(format!("unknown source {other:?}"))),
    };
    Ok(RiskEvent::new(session_id, level, observed_at, source))
}
