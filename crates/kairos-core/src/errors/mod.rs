//! Error taxonomy for the Kairos engine.
//!
//! `KairosError` is the single top-level error. Subsystem errors convert into
//! it via `#[from]` so `?` works across crate boundaries.

mod catalog_error;
mod config_error;
mod fetch_error;
mod persistence_error;

pub use catalog_error::CatalogError;
pub use config_error::ConfigError;
pub use fetch_error::FetchError;
pub use persistence_error::PersistenceError;

/// Convenience alias used throughout the workspace.
pub type KairosResult<T> = Result<T, KairosError>;

/// Top-level error for every Kairos operation.
#[derive(Debug, thiserror::Error)]
pub enum KairosError {
    /// Registry lookup miss. Recoverable: the caller decides the fallback.
    #[error("source not found: {id}")]
    NotFound { id: String },

    /// An external content source could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Every selected source failed; the session layer must fall back to
    /// proceeding without grounding content.
    #[error("no content available: all {attempted} selected sources failed")]
    NoContentAvailable { attempted: usize },

    /// The risk-event store is unavailable. Evaluation fails closed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    InvalidCatalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid risk level {value}: expected 0..=5")]
    InvalidRiskLevel { value: i64 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KairosError {
    /// Whether this error is a registry miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
