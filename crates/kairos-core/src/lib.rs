//! # kairos-core
//!
//! Foundation crate for the Kairos source relevance and retrieval engine.
//! Defines the shared models, capability traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::KairosConfig;
pub use errors::{KairosError, KairosResult};
pub use models::{DataSource, ResultRecord, RiskEvent, RiskLevel, SourceType};
