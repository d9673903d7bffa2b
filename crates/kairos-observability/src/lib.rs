//! # kairos-observability
//!
//! Tracing subscriber setup, per-operation span macros, structured log events
//! and the in-process metrics the retrieval engine reports.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{CacheMetrics, MetricsCollector, RetrievalMetrics};
pub use tracing_setup::{init_from_config, init_tracing, init_tracing_with_filter};
