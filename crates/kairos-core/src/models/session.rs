use serde::{Deserialize, Serialize};

use super::data_source::normalize_tags;

/// Kind of therapeutic session a retrieval request belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    InitialAssessment,
    #[default]
    RegularSession,
    CrisisIntervention,
    ProgressEvaluation,
    Termination,
}

/// Retrieval behaviour attached to a session type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionProtocol {
    /// Broad intake: history, screening, safety check.
    Intake,
    /// Ongoing treatment following the requested tags.
    Treatment,
    /// Crisis sources are always part of the grounding set.
    Crisis,
    /// Outcome measurement and plan review.
    Review,
    /// Relapse prevention and closure.
    Closure,
}

impl SessionProtocol {
    pub fn forces_crisis_sources(self) -> bool {
        matches!(self, Self::Crisis)
    }

    /// Heading used when rendering grounding context for this protocol.
    pub fn heading(self) -> &'static str {
        match self {
            Self::Intake => "Initial assessment references",
            Self::Treatment => "Treatment references",
            Self::Crisis => "Crisis intervention references",
            Self::Review => "Progress evaluation references",
            Self::Closure => "Termination and relapse-prevention references",
        }
    }
}

impl SessionType {
    pub fn protocol(self) -> SessionProtocol {
        match self {
            Self::InitialAssessment => SessionProtocol::Intake,
            Self::RegularSession => SessionProtocol::Treatment,
            Self::CrisisIntervention => SessionProtocol::Crisis,
            Self::ProgressEvaluation => SessionProtocol::Review,
            Self::Termination => SessionProtocol::Closure,
        }
    }
}

/// Everything the orchestrator needs to ground one session turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,
    #[serde(default)]
    pub session_type: SessionType,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub approaches: Vec<String>,
    pub query: String,
    /// Overrides `retrieval.max_results`.
    #[serde(default)]
    pub max_results: Option<usize>,
    /// Overrides `selection.min_reliability`.
    #[serde(default)]
    pub min_reliability: Option<f64>,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            session_type: SessionType::default(),
            specializations: Vec::new(),
            approaches: Vec::new(),
            query: query.into(),
            max_results: None,
            min_reliability: None,
        }
    }

    pub fn with_session_type(mut self, session_type: SessionType) -> Self {
        self.session_type = session_type;
        self
    }

    pub fn with_specializations<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.specializations = normalize_tags(tags).into_iter().collect();
        self
    }

    pub fn with_approaches<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.approaches = normalize_tags(tags).into_iter().collect();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_min_reliability(mut self, min_reliability: f64) -> Self {
        self.min_reliability = Some(min_reliability);
        self
    }
}
