//! Floor, stickiness and monotone-decay properties of risk levels.

use chrono::Duration;
use proptest::prelude::*;

use kairos_core::models::{RiskEvent, RiskLevel, RiskSource};
use kairos_risk::decay::{level_at, windows_elapsed, DecayPolicy};
use test_fixtures::hours_after_epoch;

fn arb_level() -> impl Strategy<Value = RiskLevel> {
    (0u8..=5).prop_map(|v| RiskLevel::try_from(v).unwrap())
}

fn arb_source() -> impl Strategy<Value = RiskSource> {
    prop_oneof![Just(RiskSource::ExplicitAssessment), Just(RiskSource::Inferred)]
}

/// Events in non-decreasing time order, as a live session produces them.
fn arb_events() -> impl Strategy<Value = Vec<RiskEvent>> {
    prop::collection::vec((arb_level(), arb_source(), 0i64..100), 1..20).prop_map(|raw| {
        let mut hour = 0;
        raw.into_iter()
            .map(|(level, source, gap)| {
                hour += gap;
                RiskEvent::new("s", level, hours_after_epoch(hour), source)
            })
            .collect()
    })
}

fn policy(sticky: bool) -> DecayPolicy {
    DecayPolicy::new(Duration::hours(48), sticky)
}

proptest! {
    #[test]
    fn level_never_below_latest_event_decayed(
        events in arb_events(),
        extra_hours in 0i64..1_000,
        sticky in any::<bool>(),
    ) {
        let last = events.last().unwrap();
        let now = last.observed_at + Duration::hours(extra_hours);
        let floor = last
            .level
            .saturating_sub(windows_elapsed(last.observed_at, now, Duration::hours(48)));
        prop_assert!(level_at(&events, now, policy(sticky)) >= floor);
    }

    #[test]
    fn unreleased_critical_is_permanent_when_sticky(
        events in arb_events(),
        extra_hours in 0i64..5_000,
    ) {
        let mut events = events;
        let last_at = events.last().unwrap().observed_at;
        events.push(RiskEvent::inferred("s", RiskLevel::Critical, last_at));
        let now = last_at + Duration::hours(extra_hours);
        prop_assert_eq!(level_at(&events, now, policy(true)), RiskLevel::Critical);
    }

    #[test]
    fn level_only_falls_between_events(
        events in arb_events(),
        a in 0i64..500,
        b in 0i64..500,
        sticky in any::<bool>(),
    ) {
        let last_at = events.last().unwrap().observed_at;
        let (early, late) = (a.min(b), a.max(b));
        let p = policy(sticky);
        prop_assert!(
            level_at(&events, last_at + Duration::hours(late), p)
                <= level_at(&events, last_at + Duration::hours(early), p)
        );
    }

    #[test]
    fn evaluation_is_deterministic(events in arb_events(), at in 0i64..3_000) {
        let now = hours_after_epoch(at);
        prop_assert_eq!(level_at(&events, now, policy(true)), level_at(&events, now, policy(true)));
    }

    #[test]
    fn recording_an_event_never_lowers_the_level_at_its_own_time(
        events in arb_events(),
        level in arb_level(),
        source in arb_source(),
        gap in 0i64..200,
        sticky in any::<bool>(),
    ) {
        let at = events.last().unwrap().observed_at + Duration::hours(gap);
        let p = policy(sticky);
        let before = level_at(&events, at, p);

        let mut after_events = events;
        after_events.push(RiskEvent::new("s", level, at, source));
        let after = level_at(&after_events, at, p);
        prop_assert!(after >= before, "{:?} lowered the level {:?} -> {:?}", level, before, after);
        prop_assert!(after >= level);
    }

    #[test]
    fn sticky_never_reports_less_than_non_sticky(events in arb_events(), extra in 0i64..1_000) {
        let now = events.last().unwrap().observed_at + Duration::hours(extra);
        prop_assert!(level_at(&events, now, policy(true)) >= level_at(&events, now, policy(false)));
    }
}
