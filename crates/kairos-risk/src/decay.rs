//! Pure decay arithmetic over a session's event log.
//!
//! ```text
//! level(now) = max over events e with e.observed_at <= now of
//!              e.level - floor((now - e.observed_at) / window)
//! ```
//!
//! With stickiness on, a CRITICAL event contributes CRITICAL until a later
//! (in arrival order) explicit assessment below CRITICAL releases it. From the
//! release on it decays like any other event, counting windows from the
//! release rather than from its own observation, so recording an event never
//! lowers the level at the moment it is observed.

use chrono::{DateTime, Duration, Utc};

use kairos_core::models::{RiskEvent, RiskLevel, RiskSource, RiskTrend};

/// Decay parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayPolicy {
    pub window: Duration,
    pub critical_sticky: bool,
}

impl DecayPolicy {
    pub fn new(window: Duration, critical_sticky: bool) -> Self {
        Self {
            window,
            critical_sticky,
        }
    }
}

/// Whole decay windows elapsed between `observed_at` and `now`.
pub fn windows_elapsed(observed_at: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> u64 {
    let window_ms = window.num_milliseconds();
    if window_ms <= 0 {
        return 0;
    }
    let elapsed_ms = (now - observed_at).num_milliseconds().max(0);
    (elapsed_ms / window_ms) as u64
}

/// Current level given `events` in arrival order.
///
/// Events observed after `now` are ignored. An empty history is `None`.
pub fn level_at(events: &[RiskEvent], now: DateTime<Utc>, policy: DecayPolicy) -> RiskLevel {
    let visible: Vec<&RiskEvent> = events.iter().filter(|e| e.observed_at <= now).collect();

    let mut level = RiskLevel::None;
    for (position, event) in visible.iter().enumerate() {
        let decay_from = if event.level == RiskLevel::Critical && policy.critical_sticky {
            match release_time(&visible[position + 1..]) {
                Some(released_at) => released_at.max(event.observed_at),
                None => return RiskLevel::Critical,
            }
        } else {
            event.observed_at
        };
        let steps = windows_elapsed(decay_from, now, policy.window);
        level = level.max(event.level.saturating_sub(steps));
    }
    level
}

/// Observation time of the first of `later` events (in arrival order) that
/// releases a sticky CRITICAL.
fn release_time(later: &[&RiskEvent]) -> Option<DateTime<Utc>> {
    later
        .iter()
        .find(|e| e.source == RiskSource::ExplicitAssessment && e.level < RiskLevel::Critical)
        .map(|e| e.observed_at)
}

/// Direction of change against one decay window earlier.
pub fn trend_at(events: &[RiskEvent], now: DateTime<Utc>, policy: DecayPolicy) -> RiskTrend {
    let current = level_at(events, now, policy);
    let previous = level_at(events, now - policy.window, policy);
    match current.cmp(&previous) {
        std::cmp::Ordering::Greater => RiskTrend::Rising,
        std::cmp::Ordering::Equal => RiskTrend::Stable,
        std::cmp::Ordering::Less => RiskTrend::Falling,
    }
}
