/// Failure of the external content Fetcher capability.
///
/// `Clone` because one failed in-flight fetch is delivered to every caller
/// collapsed onto it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("source {source_id} unavailable: {reason}")]
    Unavailable { source_id: String, reason: String },

    #[error("source {source_id} rate limited")]
    RateLimited { source_id: String },

    #[error("fetch for source {source_id} interrupted: {reason}")]
    Interrupted { source_id: String, reason: String },
}

impl FetchError {
    /// Shorthand for the common unavailable case.
    pub fn unavailable(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }

    /// The source the failed fetch targeted.
    pub fn source_id(&self) -> &str {
        match self {
            Self::Unavailable { source_id, .. }
            | Self::RateLimited { source_id }
            | Self::Interrupted { source_id, .. } => source_id,
        }
    }

    /// Human-readable reason, without the source id.
    pub fn reason(&self) -> String {
        match self {
            Self::Unavailable { reason, .. } | Self::Interrupted { reason, .. } => reason.clone(),
            Self::RateLimited { .. } => "rate limited".to_string(),
        }
    }
}
