//! Catalog documents and load-time validation.
//!
//! Structural defects (empty or duplicate ids) reject the whole catalog.
//! Per-source defects deactivate that source and are reported, so one bad
//! entry never takes the rest of the catalog offline.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use kairos_core::errors::{CatalogError, KairosResult};
use kairos_core::models::DataSource;

/// A catalog as authored: an ordered list of sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub sources: Vec<DataSource>,
}

/// Outcome of validating and loading a catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Snapshot version installed by the load.
    pub version: u64,
    pub loaded: usize,
    pub active: usize,
    /// `(source_id, reason)` for every source deactivated by validation.
    pub deactivated: Vec<(String, String)>,
}

impl Catalog {
    pub fn new(sources: Vec<DataSource>) -> Self {
        Self { sources }
    }

    /// Parse a TOML catalog (`[[sources]]` tables).
    pub fn from_toml(input: &str) -> KairosResult<Self> {
        toml::from_str(input).map_err(|e| {
            CatalogError::Parse {
                format: "TOML".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Parse a JSON catalog: either `{"sources": [...]}` or a bare array.
    pub fn from_json(input: &str) -> KairosResult<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Wrapped(Catalog),
            Bare(Vec<DataSource>),
        }

        let shape: Shape = serde_json::from_str(input).map_err(|e| CatalogError::Parse {
            format: "JSON".to_string(),
            reason: e.to_string(),
        })?;
        Ok(match shape {
            Shape::Wrapped(catalog) => catalog,
            Shape::Bare(sources) => Self { sources },
        })
    }

    /// Read a catalog file, choosing the format by extension (`.json`,
    /// otherwise TOML).
    pub fn load(path: &Path) -> KairosResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&raw),
            _ => Self::from_toml(&raw),
        }
    }

    /// Validate into an id-ordered map. Does not touch any registry.
    pub(crate) fn validate(self) -> KairosResult<(BTreeMap<String, DataSource>, LoadReport)> {
        let mut by_id = BTreeMap::new();
        let mut report = LoadReport::default();

        for (position, mut source) in self.sources.into_iter().enumerate() {
            source.id = source.id.trim().to_string();
            if source.id.is_empty() {
                return Err(CatalogError::EmptyId { position }.into());
            }
            if by_id.contains_key(&source.id) {
                return Err(CatalogError::DuplicateId { id: source.id }.into());
            }

            source.normalize();
            if let Some(reason) = source_defect(&source) {
                if source.is_active {
                    warn!(source_id = %source.id, %reason, "deactivating source that failed validation");
                    source.is_active = false;
                }
                report.deactivated.push((source.id.clone(), reason));
            }

            by_id.insert(source.id.clone(), source);
        }

        report.loaded = by_id.len();
        report.active = by_id.values().filter(|s| s.is_active).count();
        Ok((by_id, report))
    }
}

/// Per-source validation. Returns the reason a source cannot be served.
fn source_defect(source: &DataSource) -> Option<String> {
    let r = source.reliability_score;
    if r.is_nan() || !(0.0..=1.0).contains(&r) {
        return Some(format!("reliability score {r} outside [0, 1]"));
    }
    if source.name.trim().is_empty() {
        return Some("empty name".to_string());
    }
    None
}
