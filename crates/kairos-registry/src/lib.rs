//! # kairos-registry
//!
//! Source Registry: the catalog of knowledge sources grounding a session.
//!
//! ## Modules
//!
//! - `catalog`: parse and validate catalog documents (TOML / JSON)
//! - `registry`: `SourceRegistry`, an atomically swapped immutable snapshot
//! - `filter`: `SourceFilter` predicates and restartable `SourceListing`s
//! - `builtin`: the default clinical catalog
//! - `statistics`: catalog composition and reliability distribution

pub mod builtin;
pub mod catalog;
pub mod filter;
pub mod registry;
pub mod statistics;

pub use builtin::builtin_catalog;
pub use catalog::{Catalog, LoadReport};
pub use filter::{SourceFilter, SourceListing};
pub use registry::{CatalogSnapshot, SourceRegistry};
pub use statistics::SourceStatistics;
