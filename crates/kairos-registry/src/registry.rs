//! SourceRegistry: swap-on-reload immutable catalog snapshots.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use kairos_core::errors::{KairosError, KairosResult};
use kairos_core::models::DataSource;

use crate::catalog::{Catalog, LoadReport};
use crate::filter::{SourceFilter, SourceListing};
use crate::statistics::SourceStatistics;

/// One immutable generation of the catalog.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    sources: BTreeMap<String, DataSource>,
    version: u64,
    loaded_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    /// Sources in ascending id order.
    pub fn sources(&self) -> impl Iterator<Item = &DataSource> {
        self.sources.values()
    }

    pub fn get(&self, id: &str) -> Option<&DataSource> {
        self.sources.get(id)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}

/// The catalog of knowledge sources.
///
/// Readers take a cheap `Arc` clone of the current snapshot and never observe
/// a partially loaded catalog. `load` and `deactivate` build a complete new
/// snapshot off to the side and swap it in.
pub struct SourceRegistry {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl SourceRegistry {
    /// An empty registry (version 0).
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::default())),
        }
    }

    /// A registry pre-loaded with `sources`.
    pub fn with_sources(sources: Vec<DataSource>) -> KairosResult<Self> {
        let registry = Self::new();
        registry.load(Catalog::new(sources))?;
        Ok(registry)
    }

    /// Validate `catalog` and atomically replace the current snapshot.
    ///
    /// On error the previous snapshot stays in place untouched.
    pub fn load(&self, catalog: Catalog) -> KairosResult<LoadReport> {
        let (sources, mut report) = catalog.validate()?;

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let version = guard.version + 1;
        *guard = Arc::new(CatalogSnapshot {
            sources,
            version,
            loaded_at: Some(Utc::now()),
        });
        drop(guard);

        report.version = version;
        info!(
            version,
            loaded = report.loaded,
            active = report.active,
            deactivated = report.deactivated.len(),
            "source catalog loaded"
        );
        Ok(report)
    }

    /// Load a catalog file (TOML or JSON by extension).
    pub fn load_file(&self, path: &Path) -> KairosResult<LoadReport> {
        self.load(Catalog::load(path)?)
    }

    /// The current snapshot. Stays valid across later reloads.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look up a source regardless of activity. Callers filter on
    /// `is_active` themselves.
    pub fn get(&self, id: &str) -> KairosResult<DataSource> {
        self.snapshot()
            .get(id)
            .cloned()
            .ok_or_else(|| KairosError::NotFound { id: id.to_string() })
    }

    /// Sources matching `filter`, ordered by id.
    pub fn list(&self, filter: SourceFilter) -> SourceListing {
        SourceListing::new(self.snapshot(), filter)
    }

    /// Mark a source inactive in a new snapshot. Sources are never removed.
    ///
    /// Returns `false` if the source was already inactive.
    pub fn deactivate(&self, id: &str, reason: &str) -> KairosResult<bool> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let source = guard
            .get(id)
            .ok_or_else(|| KairosError::NotFound { id: id.to_string() })?;
        if !source.is_active {
            return Ok(false);
        }

        let mut sources = guard.sources.clone();
        if let Some(s) = sources.get_mut(id) {
            s.is_active = false;
        }
        let version = guard.version + 1;
        *guard = Arc::new(CatalogSnapshot {
            sources,
            version,
            loaded_at: guard.loaded_at,
        });
        drop(guard);

        warn!(source_id = %id, %reason, version, "source deactivated");
        Ok(true)
    }

    /// Composition and reliability distribution of the current catalog.
    pub fn statistics(&self) -> SourceStatistics {
        SourceStatistics::compute(self.snapshot().sources())
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
