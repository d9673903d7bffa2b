//! Structured log events for key engine operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a completed retrieval.
pub fn retrieval_completed(session_id: &str, sources: usize, records: usize, failures: usize) {
    tracing::info!(
        event = "retrieval_completed",
        session_id = %session_id,
        sources = sources,
        records = records,
        failures = failures,
        "retrieval completed"
    );
}

/// Log a source whose fetch failed and was omitted from the result.
pub fn source_fetch_failed(source_id: &str, reason: &str) {
    tracing::warn!(
        event = "source_fetch_failed",
        source_id = %source_id,
        reason = %reason,
        "source omitted after fetch failure"
    );
}

/// Log a retrieval where every selected source failed.
pub fn no_content_available(session_id: &str, attempted: usize) {
    tracing::error!(
        event = "no_content_available",
        session_id = %session_id,
        attempted = attempted,
        "all selected sources failed"
    );
}

/// Log crisis sources being forced into a retrieval.
pub fn crisis_widening_applied(session_id: &str, risk_level: u8, forced_by_session_type: bool) {
    tracing::warn!(
        event = "crisis_widening_applied",
        session_id = %session_id,
        risk_level = risk_level,
        forced_by_session_type = forced_by_session_type,
        "crisis sources force-included"
    );
}

/// Log an elevated risk evaluation.
pub fn risk_escalated(session_id: &str, level: u8, trend: &str) {
    tracing::warn!(
        event = "risk_escalated",
        session_id = %session_id,
        level = level,
        trend = %trend,
        "session risk escalated"
    );
}

/// Log an empty selection.
pub fn no_sources_selected(session_id: &str, requested_tags: usize) {
    tracing::info!(
        event = "no_sources_selected",
        session_id = %session_id,
        requested_tags = requested_tags,
        "no source qualified for request"
    );
}
