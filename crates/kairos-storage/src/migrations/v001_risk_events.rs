//! v001: risk_events.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS risk_events (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id   TEXT NOT NULL,
    level        INTEGER NOT NULL CHECK (level BETWEEN 0 AND 5),
    observed_at  TEXT NOT NULL,
    source       TEXT NOT NULL,
    recorded_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_risk_events_session ON risk_events(session_id, seq);
";
