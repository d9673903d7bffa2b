//! # kairos-retrieval
//!
//! The engine's public face: relevance selection over the source registry,
//! the retrieval orchestrator that combines risk, selection and the content
//! cache, and rendering of retrieved content as grounding for completion.

pub mod grounding;
pub mod orchestrator;
pub mod selection;

pub use grounding::{complete_grounded, compose_prompt, render_grounding};
pub use orchestrator::{RetrievalOrchestrator, RetrievalOutcome, RetrievedContent, SourceFailure};
pub use selection::{RelevanceSelector, ScoredSource, WeightedScorer};
