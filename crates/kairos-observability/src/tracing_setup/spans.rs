//! Span definitions per operation: selection, retrieval, fetch, risk evaluation.

/// Create a source selection span.
#[macro_export]
macro_rules! select_span {
    ($requested_tags:expr, $min_reliability:expr) => {
        tracing::info_span!(
            "kairos.select",
            requested_tags = $requested_tags,
            min_reliability = $min_reliability
        )
    };
}

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieve_span {
    ($session_id:expr, $session_type:expr) => {
        tracing::info_span!("kairos.retrieve", session_id = %$session_id, session_type = ?$session_type)
    };
}

/// Create a per-source fetch span.
#[macro_export]
macro_rules! fetch_span {
    ($source_id:expr, $max_results:expr) => {
        tracing::debug_span!("kairos.fetch", source_id = %$source_id, max_results = $max_results)
    };
}

/// Create a risk evaluation span.
#[macro_export]
macro_rules! evaluate_span {
    ($session_id:expr) => {
        tracing::info_span!("kairos.evaluate", session_id = %$session_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SELECT: &str = "kairos.select";
    pub const RETRIEVE: &str = "kairos.retrieve";
    pub const FETCH: &str = "kairos.fetch";
    pub const EVALUATE: &str = "kairos.evaluate";
}
