/// Structural catalog defects. These reject the whole catalog; per-source
/// defects only deactivate the offending source.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate source id in catalog: {id}")]
    DuplicateId { id: String },

    #[error("catalog entry at position {position} has an empty id")]
    EmptyId { position: usize },

    #[error("failed to parse {format} catalog: {reason}")]
    Parse { format: String, reason: String },

    #[error("failed to read catalog {path}: {reason}")]
    Io { path: String, reason: String },
}
