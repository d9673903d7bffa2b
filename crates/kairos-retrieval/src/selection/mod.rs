//! Relevance selection: filter the registry to qualifying sources, score
//! them, and order them deterministically.

mod scorer;

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use kairos_core::config::SelectionConfig;
use kairos_core::models::{normalize_tags, DataSource};
use kairos_core::traits::{IRelevanceScorer, RelevanceSignals};
use kairos_registry::{CatalogSnapshot, SourceFilter, SourceRegistry};

pub use scorer::WeightedScorer;

/// A selected source with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSource {
    pub source: DataSource,
    pub score: f64,
    pub signals: RelevanceSignals,
}

/// Ranks registry sources for a request. Pure: reads the current catalog
/// snapshot and never mutates anything.
pub struct RelevanceSelector {
    registry: Arc<SourceRegistry>,
    scorer: Arc<dyn IRelevanceScorer>,
}

impl RelevanceSelector {
    pub fn new(registry: Arc<SourceRegistry>, scorer: Arc<dyn IRelevanceScorer>) -> Self {
        Self { registry, scorer }
    }

    /// Selector using a [`WeightedScorer`] built from `config`.
    pub fn from_config(registry: Arc<SourceRegistry>, config: &SelectionConfig) -> Self {
        Self::new(registry, Arc::new(WeightedScorer::from_config(config)))
    }

    /// Same registry, different scorer.
    pub fn with_scorer(self, scorer: Arc<dyn IRelevanceScorer>) -> Self {
        Self::new(self.registry, scorer)
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Active sources with `reliability_score >= min_reliability` sharing at
    /// least one requested specialization or approach, by descending score
    /// then ascending id. Empty when nothing qualifies.
    pub fn select(
        &self,
        specializations: &[String],
        approaches: &[String],
        min_reliability: f64,
    ) -> Vec<ScoredSource> {
        let span = kairos_observability::select_span!(
            specializations.len() + approaches.len(),
            min_reliability
        );
        let _guard = span.enter();

        let snapshot = self.registry.snapshot();
        let selected = select_from(
            &snapshot,
            self.scorer.as_ref(),
            &normalize_tags(specializations),
            &normalize_tags(approaches),
            min_reliability,
        );
        debug!(
            selected = selected.len(),
            catalog_version = snapshot.version(),
            "sources selected"
        );
        selected
    }

    /// [`select`](Self::select) with every qualifying crisis source moved to
    /// the front. Scores are computed against the caller's tags only, so the
    /// relative order of the other sources is the same as without widening.
    pub fn select_with_crisis(
        &self,
        specializations: &[String],
        approaches: &[String],
        min_reliability: f64,
    ) -> Vec<ScoredSource> {
        let span = kairos_observability::select_span!(
            specializations.len() + approaches.len(),
            min_reliability
        );
        let _guard = span.enter();

        let snapshot = self.registry.snapshot();
        let specializations = normalize_tags(specializations);
        let approaches = normalize_tags(approaches);

        let mut merged = crisis_sources_from(
            &snapshot,
            self.scorer.as_ref(),
            &specializations,
            &approaches,
            min_reliability,
        );
        let crisis_count = merged.len();
        merged.extend(
            select_from(
                &snapshot,
                self.scorer.as_ref(),
                &specializations,
                &approaches,
                min_reliability,
            )
            .into_iter()
            .filter(|scored| !scored.source.is_crisis_source()),
        );
        debug!(
            crisis = crisis_count,
            selected = merged.len(),
            catalog_version = snapshot.version(),
            "sources selected with crisis widening"
        );
        merged
    }
}

/// Selection against one snapshot. Tags must already be normalized.
pub fn select_from(
    snapshot: &CatalogSnapshot,
    scorer: &dyn IRelevanceScorer,
    specializations: &BTreeSet<String>,
    approaches: &BTreeSet<String>,
    min_reliability: f64,
) -> Vec<ScoredSource> {
    if specializations.is_empty() && approaches.is_empty() {
        return Vec::new();
    }

    let filter = SourceFilter::active().with_min_reliability(min_reliability);
    let mut scored: Vec<ScoredSource> = snapshot
        .sources()
        .filter(|source| filter.matches(source))
        .filter_map(|source| {
            let signals = signals_for(source, specializations, approaches);
            if signals.matched_tags == 0 {
                return None;
            }
            Some(score_source(scorer, source, signals))
        })
        .collect();

    scored.sort_by(rank_order);
    scored
}

/// Every active crisis source at or above `min_reliability`, whether or not
/// it shares a requested tag, scored against the request as given.
pub fn crisis_sources_from(
    snapshot: &CatalogSnapshot,
    scorer: &dyn IRelevanceScorer,
    specializations: &BTreeSet<String>,
    approaches: &BTreeSet<String>,
    min_reliability: f64,
) -> Vec<ScoredSource> {
    let filter = SourceFilter::active().with_min_reliability(min_reliability);
    let mut scored: Vec<ScoredSource> = snapshot
        .sources()
        .filter(|source| filter.matches(source) && source.is_crisis_source())
        .map(|source| {
            let signals = signals_for(source, specializations, approaches);
            score_source(scorer, source, signals)
        })
        .collect();

    scored.sort_by(rank_order);
    scored
}

fn signals_for(
    source: &DataSource,
    specializations: &BTreeSet<String>,
    approaches: &BTreeSet<String>,
) -> RelevanceSignals {
    let requested = specializations.len() + approaches.len();
    let matched = specializations
        .iter()
        .filter(|tag| source.matches_specialization(tag))
        .count()
        + approaches
            .iter()
            .filter(|tag| source.matches_approach(tag))
            .count();
    let overlap_fraction = if requested == 0 {
        0.0
    } else {
        matched as f64 / requested as f64
    };
    RelevanceSignals {
        overlap_fraction,
        matched_tags: matched,
        requested_tags: requested,
    }
}

fn score_source(
    scorer: &dyn IRelevanceScorer,
    source: &DataSource,
    signals: RelevanceSignals,
) -> ScoredSource {
    ScoredSource {
        score: scorer.score(source, &signals),
        source: source.clone(),
        signals,
    }
}

/// Descending score, then ascending id.
fn rank_order(a: &ScoredSource, b: &ScoredSource) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.source.id.cmp(&b.source.id))
}
