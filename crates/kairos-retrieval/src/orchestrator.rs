//! RetrievalOrchestrator: risk evaluation, selection, cached fan-out.
//!
//! Steps per request:
//! 1. Evaluate session risk (fails closed on store errors)
//! 2. Widen to crisis sources when risk reaches the threshold or the session
//!    protocol demands it
//! 3. Select and rank sources against the caller's tags, with every qualifying
//!    crisis source moved to the front when widened
//! 4. Fetch through the cache for up to `fan_out_limit` sources in parallel
//! 5. Drop records already served by a higher-ranked source

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use kairos_cache::{CacheStats, CachedContent, ContentCache, FetchRequest};
use kairos_core::config::KairosConfig;
use kairos_core::errors::{FetchError, KairosError, KairosResult};
use kairos_core::models::{DataSource, ResultRecord, RiskAssessment, RiskLevel, SessionContext};
use kairos_core::traits::IRelevanceScorer;
use kairos_observability::tracing_setup::events;
use kairos_observability::{CacheMetrics, MetricsCollector};
use kairos_registry::SourceRegistry;
use kairos_risk::RiskStateMachine;

use crate::selection::{RelevanceSelector, ScoredSource};

/// One source's contribution to a retrieval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedContent {
    pub source: DataSource,
    pub score: f64,
    /// Records in provider order, minus duplicates of higher-ranked sources.
    pub records: Vec<ResultRecord>,
    pub from_cache: bool,
}

/// A selected source whose fetch failed and was left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFailure {
    pub source_id: String,
    pub reason: String,
    #[serde(skip)]
    pub error: FetchError,
}

/// Result of [`RetrievalOrchestrator::retrieve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalOutcome {
    pub session_id: String,
    /// Successful sources in rank order.
    pub items: Vec<RetrievedContent>,
    pub failures: Vec<SourceFailure>,
    pub risk: RiskAssessment,
    pub crisis_widened: bool,
}

impl RetrievalOutcome {
    pub fn record_count(&self) -> usize {
        self.items.iter().map(|i| i.records.len()).sum()
    }

    /// Content was returned but at least one source failed.
    pub fn is_partial(&self) -> bool {
        !self.items.is_empty() && !self.failures.is_empty()
    }

    pub fn source_ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.source.id.as_str()).collect()
    }

    /// JSON form handed to the session layer.
    pub fn to_json(&self) -> KairosResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Composes risk, selection and the content cache into one call for the
/// session layer.
pub struct RetrievalOrchestrator {
    selector: RelevanceSelector,
    cache: Arc<ContentCache>,
    risk: Arc<RiskStateMachine>,
    config: KairosConfig,
    metrics: Mutex<MetricsCollector>,
}

impl RetrievalOrchestrator {
    pub fn new(
        registry: Arc<SourceRegistry>,
        cache: Arc<ContentCache>,
        risk: Arc<RiskStateMachine>,
        config: KairosConfig,
    ) -> Self {
        info!(
            min_reliability = config.selection.min_reliability,
            crisis_threshold = config.risk.crisis_threshold,
            fan_out_limit = config.retrieval.fan_out_limit,
            max_results = config.retrieval.max_results,
            "retrieval orchestrator ready"
        );
        Self {
            selector: RelevanceSelector::from_config(registry, &config.selection),
            cache,
            risk,
            config,
            metrics: Mutex::new(MetricsCollector::new()),
        }
    }

    /// Replace the default weighted scorer.
    pub fn with_scorer(mut self, scorer: Arc<dyn IRelevanceScorer>) -> Self {
        self.selector = self.selector.with_scorer(scorer);
        self
    }

    pub fn selector(&self) -> &RelevanceSelector {
        &self.selector
    }

    /// Retrieve grounding content for a session turn.
    pub fn retrieve(&self, context: &SessionContext) -> KairosResult<RetrievalOutcome> {
        self.retrieve_at(context, Utc::now())
    }

    /// [`retrieve`](Self::retrieve) with an explicit clock, used for both
    /// risk decay and cache freshness.
    pub fn retrieve_at(
        &self,
        context: &SessionContext,
        now: DateTime<Utc>,
    ) -> KairosResult<RetrievalOutcome> {
        let span = kairos_observability::retrieve_span!(context.session_id, context.session_type);
        let _guard = span.enter();

        let risk = self.evaluate_risk(&context.session_id, now)?;
        let forced = context.session_type.protocol().forces_crisis_sources();
        let crisis_widened = forced || risk.level.as_u8() >= self.config.risk.crisis_threshold;

        let min_reliability = context
            .min_reliability
            .unwrap_or(self.config.selection.min_reliability);
        let mut selected = if crisis_widened {
            events::crisis_widening_applied(&context.session_id, risk.level.as_u8(), forced);
            self.selector.select_with_crisis(
                &context.specializations,
                &context.approaches,
                min_reliability,
            )
        } else {
            self.selector
                .select(&context.specializations, &context.approaches, min_reliability)
        };
        selected.truncate(self.config.retrieval.fan_out_limit);

        if selected.is_empty() {
            events::no_sources_selected(
                &context.session_id,
                context.specializations.len() + context.approaches.len(),
            );
            self.lock_metrics().retrieval.record_empty_selection();
            return Ok(RetrievalOutcome {
                session_id: context.session_id.clone(),
                items: Vec::new(),
                failures: Vec::new(),
                risk,
                crisis_widened,
            });
        }

        let max_results = context
            .max_results
            .unwrap_or(self.config.retrieval.max_results);
        let fetched = self.fetch_all(&selected, &context.query, max_results, now);
        let outcome = self.assemble(context, fetched, risk, crisis_widened);
        self.refresh_cache_metrics();
        outcome
    }

    fn evaluate_risk(&self, session_id: &str, now: DateTime<Utc>) -> KairosResult<RiskAssessment> {
        let span = kairos_observability::evaluate_span!(session_id);
        let _guard = span.enter();

        let assessment = self.risk.evaluate(session_id, now)?;
        if assessment.level >= RiskLevel::High {
            let trend = format!("{:?}", assessment.trend).to_lowercase();
            events::risk_escalated(session_id, assessment.level.as_u8(), &trend);
        }
        Ok(assessment)
    }

    /// Fetch every selected source through the cache, in parallel, keeping
    /// rank order in the result.
    fn fetch_all(
        &self,
        selected: &[ScoredSource],
        query: &str,
        max_results: usize,
        now: DateTime<Utc>,
    ) -> Vec<(ScoredSource, Result<CachedContent, FetchError>)> {
        selected
            .par_iter()
            .map(|scored| {
                let source = &scored.source;
                let span = kairos_observability::fetch_span!(source.id, max_results);
                let _guard = span.enter();
                let request = FetchRequest::new(&source.id, query, max_results)
                    .with_ttl(source.cache_ttl());
                (scored.clone(), self.cache.fetch_with(&request, now))
            })
            .collect()
    }

    fn assemble(
        &self,
        context: &SessionContext,
        fetched: Vec<(ScoredSource, Result<CachedContent, FetchError>)>,
        risk: RiskAssessment,
        crisis_widened: bool,
    ) -> KairosResult<RetrievalOutcome> {
        let attempted = fetched.len();
        let mut items = Vec::with_capacity(attempted);
        let mut failures = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut duplicates = 0usize;

        for (scored, result) in fetched {
            match result {
                Ok(content) => {
                    let from_cache = content.from_cache();
                    let before = content.records.len();
                    let records: Vec<ResultRecord> = content
                        .records
                        .into_iter()
                        .filter(|r| seen.insert(r.content_hash.clone()))
                        .collect();
                    duplicates += before - records.len();
                    items.push(RetrievedContent {
                        from_cache,
                        source: scored.source,
                        score: scored.score,
                        records,
                    });
                }
                Err(error) => {
                    events::source_fetch_failed(&scored.source.id, &error.reason());
                    failures.push(SourceFailure {
                        source_id: scored.source.id,
                        reason: error.to_string(),
                        error,
                    });
                }
            }
        }

        let mut metrics = self.lock_metrics();
        for failure in &failures {
            metrics.retrieval.record_source_failure(&failure.source_id);
        }

        if items.is_empty() {
            metrics.retrieval.record_total_failure(crisis_widened);
            drop(metrics);
            events::no_content_available(&context.session_id, attempted);
            return Err(KairosError::NoContentAvailable { attempted });
        }

        let outcome = RetrievalOutcome {
            session_id: context.session_id.clone(),
            items,
            failures,
            risk,
            crisis_widened,
        };
        metrics.retrieval.record_duplicates(duplicates);
        metrics.retrieval.record_request(
            outcome.record_count(),
            outcome.failures.len(),
            crisis_widened,
        );
        drop(metrics);

        if duplicates > 0 {
            debug!(duplicates, "dropped records already served by higher-ranked sources");
        }
        events::retrieval_completed(
            &context.session_id,
            outcome.items.len(),
            outcome.record_count(),
            outcome.failures.len(),
        );
        Ok(outcome)
    }

    /// Snapshot of retrieval and cache metrics.
    pub fn metrics(&self) -> MetricsCollector {
        self.refresh_cache_metrics();
        self.lock_metrics().clone()
    }

    /// Live cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn refresh_cache_metrics(&self) {
        let stats = self.cache.stats();
        self.lock_metrics().cache = cache_metrics(&stats);
    }

    fn lock_metrics(&self) -> MutexGuard<'_, MetricsCollector> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn cache_metrics(stats: &CacheStats) -> CacheMetrics {
    CacheMetrics {
        hits: stats.hits,
        misses: stats.misses,
        fetches: stats.fetches,
        fetch_failures: stats.fetch_failures,
        collapsed_waits: stats.collapsed,
        evictions: stats.evictions,
        expirations: stats.expirations,
        entries: stats.entries,
        total_weight: stats.total_weight,
        capacity_weight: stats.capacity_weight,
    }
}

impl std::fmt::Debug for RetrievalOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalOrchestrator")
            .field("scorer", &self.selector.scorer_name())
            .field("fan_out_limit", &self.config.retrieval.fan_out_limit)
            .finish_non_exhaustive()
    }
}
