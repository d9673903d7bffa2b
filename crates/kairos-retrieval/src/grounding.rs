//! Grounding renderer: turns a retrieval outcome into the context block the
//! completion provider is prompted with.

use tracing::debug;

use kairos_core::errors::KairosResult;
use kairos_core::models::SessionContext;
use kairos_core::traits::ICompletionProvider;

use crate::orchestrator::{RetrievalOutcome, RetrievedContent};

/// Numbered, citation-tagged references in rank order.
///
/// Each record renders as `[n] title (source name; citation)` followed by its
/// body. Numbering runs across sources. Empty input renders as an empty
/// string.
pub fn render_grounding(items: &[RetrievedContent]) -> String {
    let entries: Vec<String> = items
        .iter()
        .flat_map(|item| item.records.iter().map(move |record| (item, record)))
        .enumerate()
        .map(|(i, (item, record))| {
            let citation = record
                .citation
                .as_deref()
                .map(|c| format!("; {c}"))
                .unwrap_or_default();
            format!(
                "[{}] {} ({}{citation})\n{}",
                i + 1,
                record.title,
                item.source.name,
                record.body.trim()
            )
        })
        .collect();
    entries.join("\n\n").trim_end().to_string()
}

/// Full prompt for one session turn: protocol heading, references, then the
/// client query. Without references the query is sent on its own.
pub fn compose_prompt(context: &SessionContext, outcome: &RetrievalOutcome) -> String {
    let references = render_grounding(&outcome.items);
    if references.is_empty() {
        return format!("Query: {}", context.query);
    }
    let heading = context.session_type.protocol().heading();
    format!("{heading}:\n\n{references}\n\nQuery: {}", context.query)
}

/// Prompt `provider` with the grounded query.
pub fn complete_grounded(
    provider: &dyn ICompletionProvider,
    context: &SessionContext,
    outcome: &RetrievalOutcome,
) -> KairosResult<String> {
    let prompt = compose_prompt(context, outcome);
    debug!(
        provider = provider.name(),
        session_id = %context.session_id,
        references = outcome.record_count(),
        prompt_len = prompt.len(),
        "requesting grounded completion"
    );
    provider.complete(&prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kairos_core::models::{
        DataSource, ResultRecord, RiskAssessment, RiskLevel, RiskTrend, SessionType, SourceType,
    };

    fn item(id: &str, name: &str, records: Vec<ResultRecord>) -> RetrievedContent {
        RetrievedContent {
            source: DataSource::new(id, name, SourceType::Protocol, 0.9),
            score: 0.9,
            records,
            from_cache: false,
        }
    }

    fn outcome(items: Vec<RetrievedContent>) -> RetrievalOutcome {
        RetrievalOutcome {
            session_id: "s1".to_string(),
            items,
            failures: Vec::new(),
            risk: RiskAssessment {
                session_id: "s1".to_string(),
                level: RiskLevel::None,
                trend: RiskTrend::Stable,
                evaluated_at: Utc::now(),
                event_count: 0,
            },
            crisis_widened: false,
        }
    }

    #[test]
    fn numbering_runs_across_sources() {
        let items = vec![
            item(
                "cbt",
                "CBT Manual",
                vec![ResultRecord::new("Exposure", "Graded exposure.").with_citation("ch. 4")],
            ),
            item("who", "WHO", vec![ResultRecord::new("Psychoeducation", "Explain the cycle.")]),
        ];
        let text = render_grounding(&items);
        assert_eq!(
            text,
            "[1] Exposure (CBT Manual; ch. 4)\nGraded exposure.\n\n\
             [2] Psychoeducation (WHO)\nExplain the cycle."
        );
    }

    #[test]
    fn blank_body_leaves_no_trailing_whitespace() {
        let items = vec![item(
            "who",
            "WHO",
            vec![
                ResultRecord::new("Grounding", "  Name five things you see.  "),
                ResultRecord::new("Breathing", "   "),
            ],
        )];
        assert_eq!(
            render_grounding(&items),
            "[1] Grounding (WHO)\nName five things you see.\n\n[2] Breathing (WHO)"
        );
        assert_eq!(render_grounding(&[]), "");
    }

    #[test]
    fn empty_outcome_sends_bare_query() {
        let ctx = SessionContext::new("s1", "sleep problems");
        assert_eq!(compose_prompt(&ctx, &outcome(Vec::new())), "Query: sleep problems");
    }

    #[test]
    fn prompt_uses_protocol_heading() {
        let ctx = SessionContext::new("s1", "safety plan")
            .with_session_type(SessionType::CrisisIntervention);
        let out = outcome(vec![item("crisis", "Crisis", vec![ResultRecord::new("Plan", "Steps.")])]);
        let prompt = compose_prompt(&ctx, &out);
        assert!(prompt.starts_with("Crisis intervention references:\n\n[1] Plan (Crisis)"));
        assert!(prompt.ends_with("Query: safety plan"));
    }
}
