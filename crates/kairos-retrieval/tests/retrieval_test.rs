//! End-to-end retrieval: selection, risk-driven crisis widening, cached
//! fan-out, partial and total failure, deduplication and grounding.

use std::sync::Arc;

use kairos_cache::ContentCache;
use kairos_core::config::KairosConfig;
use kairos_core::errors::{KairosError, PersistenceError};
use kairos_core::models::{DataSource, RiskEvent, RiskLevel, SessionContext, SessionType};
use kairos_core::traits::{IRelevanceScorer, IRiskEventStore, RelevanceSignals};
use kairos_registry::{builtin_catalog, SourceRegistry};
use kairos_retrieval::{complete_grounded, RetrievalOrchestrator};
use kairos_risk::{InMemoryRiskStore, RiskStateMachine};
use test_fixtures::{
    epoch, hours_after_epoch, mixed_sources, records, EchoCompletionProvider, ScriptedFetcher,
    UnavailableRiskStore,
};

struct Harness {
    fetcher: Arc<ScriptedFetcher>,
    risk: Arc<RiskStateMachine>,
    orchestrator: RetrievalOrchestrator,
}

fn harness_with(
    sources: Vec<DataSource>,
    fetcher: ScriptedFetcher,
    store: Arc<dyn IRiskEventStore>,
    config: KairosConfig,
) -> Harness {
    let registry = Arc::new(SourceRegistry::with_sources(sources).unwrap());
    let fetcher = Arc::new(fetcher);
    let cache = Arc::new(ContentCache::new(fetcher.clone(), &config.cache));
    let risk = Arc::new(RiskStateMachine::new(store, config.risk.clone()));
    let orchestrator = RetrievalOrchestrator::new(registry, cache, Arc::clone(&risk), config);
    Harness {
        fetcher,
        risk,
        orchestrator,
    }
}

fn harness(fetcher: ScriptedFetcher) -> Harness {
    harness_with(
        mixed_sources(),
        fetcher,
        Arc::new(InMemoryRiskStore::new()),
        KairosConfig::default(),
    )
}

fn anxiety_cbt(session_id: &str) -> SessionContext {
    SessionContext::new(session_id, "panic attacks")
        .with_specializations(["anxiety"])
        .with_approaches(["cbt"])
}

#[test]
fn retrieves_ranked_sources_and_skips_inactive() {
    let h = harness(ScriptedFetcher::new());
    let outcome = h.orchestrator.retrieve_at(&anxiety_cbt("s1"), epoch()).unwrap();

    // cbt_manual: 0.6 * 0.96 + 0.4; pubmed matches both tags by wildcard.
    assert_eq!(outcome.source_ids(), vec!["cbt_manual", "pubmed"]);
    assert!(!outcome.crisis_widened);
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.record_count(), 6);
    assert_eq!(h.fetcher.calls_for("retired_db"), 0);
    assert_eq!(outcome.risk.level, RiskLevel::None);
}

#[test]
fn repeated_request_within_ttl_is_served_from_cache() {
    let h = harness(ScriptedFetcher::new());
    let first = h.orchestrator.retrieve_at(&anxiety_cbt("s1"), epoch()).unwrap();
    assert!(first.items.iter().all(|i| !i.from_cache));
    assert_eq!(h.fetcher.calls(), 2);

    let second = h
        .orchestrator
        .retrieve_at(&anxiety_cbt("s2"), hours_after_epoch(1))
        .unwrap();
    assert!(second.items.iter().all(|i| i.from_cache));
    for (a, b) in first.items.iter().zip(&second.items) {
        assert_eq!(a.source.id, b.source.id);
        assert_eq!(a.records, b.records);
    }
    assert_eq!(h.fetcher.calls(), 2);

    let metrics = h.orchestrator.metrics();
    assert_eq!(metrics.cache.hits, 2);
    assert_eq!(metrics.cache.fetches, 2);
    assert_eq!(metrics.retrieval.complete, 2);
}

#[test]
fn partial_failure_returns_surviving_sources() {
    let h = harness(ScriptedFetcher::new().failing("pubmed"));
    let outcome = h.orchestrator.retrieve_at(&anxiety_cbt("s1"), epoch()).unwrap();

    assert!(outcome.is_partial());
    assert_eq!(outcome.source_ids(), vec!["cbt_manual"]);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].source_id, "pubmed");

    let metrics = h.orchestrator.metrics();
    assert_eq!(metrics.retrieval.partial_failures, 1);
    assert_eq!(metrics.retrieval.failures_by_source["pubmed"], 1);
}

#[test]
fn all_sources_failing_is_no_content_available() {
    let h = harness(ScriptedFetcher::new().failing("pubmed").failing("cbt_manual"));
    let err = h
        .orchestrator
        .retrieve_at(&anxiety_cbt("s1"), epoch())
        .unwrap_err();
    assert!(matches!(err, KairosError::NoContentAvailable { attempted: 2 }));

    // Failures are not cached: the next request tries again.
    let _ = h.orchestrator.retrieve_at(&anxiety_cbt("s1"), epoch());
    assert_eq!(h.fetcher.calls(), 4);
    assert_eq!(h.orchestrator.metrics().retrieval.total_failures, 2);
}

#[test]
fn nothing_qualifying_is_an_empty_success() {
    let h = harness(ScriptedFetcher::new());
    let ctx = SessionContext::new("s1", "grief").with_specializations(["grief"]);
    let ctx = ctx.with_min_reliability(0.96);
    let outcome = h.orchestrator.retrieve_at(&ctx, epoch()).unwrap();

    assert!(outcome.items.is_empty());
    assert_eq!(h.fetcher.calls(), 0);
    assert_eq!(h.orchestrator.metrics().retrieval.empty_selections, 1);
}

#[test]
fn critical_risk_widens_to_crisis_sources_first() {
    let mut config = KairosConfig::default();
    config.retrieval.fan_out_limit = 1;
    let h = harness_with(
        mixed_sources(),
        ScriptedFetcher::new(),
        Arc::new(InMemoryRiskStore::new()),
        config,
    );
    h.risk
        .record(RiskEvent::explicit("s1", RiskLevel::Critical, epoch()))
        .unwrap();

    let ctx = SessionContext::new("s1", "panic attacks").with_specializations(["anxiety"]);
    let outcome = h.orchestrator.retrieve_at(&ctx, hours_after_epoch(1)).unwrap();

    assert!(outcome.crisis_widened);
    assert_eq!(outcome.risk.level, RiskLevel::Critical);
    assert_eq!(outcome.source_ids(), vec!["crisis_protocol"]);
    assert_eq!(h.orchestrator.metrics().retrieval.crisis_widenings, 1);
}

#[test]
fn risk_below_threshold_does_not_widen() {
    let h = harness(ScriptedFetcher::new());
    h.risk
        .record(RiskEvent::explicit("s1", RiskLevel::High, epoch()))
        .unwrap();
    let outcome = h.orchestrator.retrieve_at(&anxiety_cbt("s1"), epoch()).unwrap();
    assert!(!outcome.crisis_widened);
    assert!(!outcome.source_ids().contains(&"crisis_protocol"));
}

#[test]
fn crisis_session_forces_crisis_sources_without_risk_events() {
    let h = harness(ScriptedFetcher::new());
    let ctx = anxiety_cbt("s1").with_session_type(SessionType::CrisisIntervention);
    let outcome = h.orchestrator.retrieve_at(&ctx, epoch()).unwrap();

    assert!(outcome.crisis_widened);
    assert_eq!(outcome.risk.level, RiskLevel::None);
    assert_eq!(outcome.source_ids()[0], "crisis_protocol");
}

#[test]
fn widening_keeps_the_relative_order_of_other_sources() {
    let h = harness(ScriptedFetcher::new());
    let plain = h.orchestrator.retrieve_at(&anxiety_cbt("s1"), epoch()).unwrap();
    let crisis_ctx = anxiety_cbt("s2").with_session_type(SessionType::CrisisIntervention);
    let widened = h.orchestrator.retrieve_at(&crisis_ctx, epoch()).unwrap();

    assert_eq!(plain.source_ids(), vec!["cbt_manual", "pubmed"]);
    assert_eq!(widened.source_ids(), vec!["crisis_protocol", "cbt_manual", "pubmed"]);
    for (a, b) in plain.items.iter().zip(&widened.items[1..]) {
        assert_eq!(a.score, b.score);
    }
}

#[test]
fn fan_out_limit_caps_fetched_sources() {
    let mut config = KairosConfig::default();
    config.retrieval.fan_out_limit = 1;
    let h = harness_with(
        mixed_sources(),
        ScriptedFetcher::new(),
        Arc::new(InMemoryRiskStore::new()),
        config,
    );
    let outcome = h.orchestrator.retrieve_at(&anxiety_cbt("s1"), epoch()).unwrap();
    assert_eq!(outcome.source_ids(), vec!["cbt_manual"]);
    assert_eq!(h.fetcher.calls(), 1);
}

#[test]
fn duplicate_records_keep_the_higher_ranked_copy() {
    let shared = records("shared", 2);
    let h = harness(
        ScriptedFetcher::new()
            .with_records("cbt_manual", shared.clone())
            .with_records("pubmed", shared),
    );
    let outcome = h.orchestrator.retrieve_at(&anxiety_cbt("s1"), epoch()).unwrap();

    assert_eq!(outcome.items[0].records.len(), 2);
    assert!(outcome.items[1].records.is_empty());
    assert_eq!(outcome.record_count(), 2);
    assert_eq!(h.orchestrator.metrics().retrieval.duplicates_dropped, 2);
}

#[test]
fn max_results_override_limits_records_per_source() {
    let h = harness(ScriptedFetcher::new().with_records("cbt_manual", records("cbt_manual", 8)));
    let ctx = anxiety_cbt("s1").with_max_results(2);
    let outcome = h.orchestrator.retrieve_at(&ctx, epoch()).unwrap();
    assert!(outcome.items.iter().all(|i| i.records.len() <= 2));
}

#[test]
fn unavailable_risk_store_fails_closed_before_fetching() {
    let h = harness_with(
        mixed_sources(),
        ScriptedFetcher::new(),
        Arc::new(UnavailableRiskStore),
        KairosConfig::default(),
    );
    let err = h
        .orchestrator
        .retrieve_at(&anxiety_cbt("s1"), epoch())
        .unwrap_err();
    assert!(matches!(
        err,
        KairosError::Persistence(PersistenceError::Unavailable { .. })
    ));
    assert_eq!(h.fetcher.calls(), 0);
}

#[test]
fn crisis_protocol_uses_its_own_cache_duration() {
    let mut sources = builtin_catalog().sources;
    sources.retain(|s| s.id == "crisis_protocol" || s.id == "pubmed");
    let h = harness_with(
        sources,
        ScriptedFetcher::new(),
        Arc::new(InMemoryRiskStore::new()),
        KairosConfig::default(),
    );
    let ctx = SessionContext::new("s1", "safety plan")
        .with_specializations(["anxiety"])
        .with_session_type(SessionType::CrisisIntervention);

    h.orchestrator.retrieve_at(&ctx, epoch()).unwrap();
    h.orchestrator.retrieve_at(&ctx, hours_after_epoch(2)).unwrap();

    // One-hour override versus the 24 hour default.
    assert_eq!(h.fetcher.calls_for("crisis_protocol"), 2);
    assert_eq!(h.fetcher.calls_for("pubmed"), 1);
}

#[test]
fn grounded_completion_cites_retrieved_records() {
    let h = harness(ScriptedFetcher::new());
    let ctx = anxiety_cbt("s1");
    let outcome = h.orchestrator.retrieve_at(&ctx, epoch()).unwrap();

    let provider = EchoCompletionProvider::default();
    let reply = complete_grounded(&provider, &ctx, &outcome).unwrap();

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("Treatment references:"));
    assert!(prompts[0].contains("[1] cbt_manual #0 (CBT Treatment Manual)"));
    assert!(prompts[0].contains("[6] pubmed #2 (PubMed Central)"));
    assert!(reply.ends_with("Query: panic attacks"));
}

#[test]
fn outcome_serializes_without_internal_error_values() {
    let h = harness(ScriptedFetcher::new().failing("pubmed"));
    let outcome = h.orchestrator.retrieve_at(&anxiety_cbt("s1"), epoch()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&outcome.to_json().unwrap()).unwrap();

    assert_eq!(json["session_id"], "s1");
    assert_eq!(json["items"][0]["source"]["id"], "cbt_manual");
    assert_eq!(json["failures"][0]["source_id"], "pubmed");
    assert!(json["failures"][0].get("error").is_none());
    assert_eq!(json["risk"]["level"], 0);
}

struct LeastReliableFirst;

impl IRelevanceScorer for LeastReliableFirst {
    fn score(&self, source: &DataSource, _signals: &RelevanceSignals) -> f64 {
        1.0 - source.reliability_score
    }

    fn name(&self) -> &str {
        "least-reliable-first"
    }
}

#[test]
fn custom_scorer_changes_the_ranking() {
    let h = harness(ScriptedFetcher::new());
    let orchestrator = h.orchestrator.with_scorer(Arc::new(LeastReliableFirst));
    assert_eq!(orchestrator.selector().scorer_name(), "least-reliable-first");

    let outcome = orchestrator.retrieve_at(&anxiety_cbt("s1"), epoch()).unwrap();
    assert_eq!(outcome.source_ids(), vec!["pubmed", "cbt_manual"]);
}
