//! Shared fixtures for Kairos integration tests: catalog documents,
//! scripted content fetchers, risk stores and completion providers.
//!
//! Everything here panics freely on misuse. It is only ever linked into tests
//! and benches.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;

use kairos_core::errors::{FetchError, KairosResult, PersistenceError};
use kairos_core::models::{DataSource, ResultRecord, RiskEvent, SourceType};
use kairos_core::traits::{ICompletionProvider, IContentFetcher, IRiskEventStore};

/// Root directory of the fixture documents.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

#[derive(serde::Deserialize)]
struct CatalogDocument {
    sources: Vec<DataSource>,
}

/// Sources from a `{"sources": [...]}` fixture under `fixtures/catalogs/`.
pub fn load_catalog_sources(name: &str) -> Vec<DataSource> {
    load_fixture::<CatalogDocument>(&format!("catalogs/{name}.json")).sources
}

/// A(0.9, {anxiety}) and B(0.7, {anxiety}).
pub fn anxiety_scenario_sources() -> Vec<DataSource> {
    load_catalog_sources("anxiety_scenario")
}

/// Three protocols, one wildcard research database and one inactive source.
pub fn mixed_sources() -> Vec<DataSource> {
    load_catalog_sources("mixed")
}

/// A guideline source with the given specializations.
pub fn source(id: &str, reliability: f64, specializations: &[&str]) -> DataSource {
    DataSource::new(id, id.to_uppercase(), SourceType::Guideline, reliability)
        .with_specializations(specializations.iter().copied())
}

/// `n` distinct records for a source.
pub fn records(source_id: &str, n: usize) -> Vec<ResultRecord> {
    (0..n)
        .map(|i| ResultRecord::new(format!("{source_id} #{i}"), format!("body {i} from {source_id}")))
        .collect()
}

/// A fixed instant: 2024-01-01T00:00:00Z.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap()
}

/// `epoch()` shifted by `hours`.
pub fn hours_after_epoch(hours: i64) -> DateTime<Utc> {
    epoch() + chrono::Duration::hours(hours)
}

enum Script {
    Records(Vec<ResultRecord>),
    Fail(FetchError),
}

/// Content fetcher driven by per-source scripts that counts every call.
///
/// Unscripted sources answer with three generated records.
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, Script>>,
    calls: AtomicUsize,
    calls_by_source: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            calls_by_source: Mutex::new(HashMap::new()),
            delay: None,
        }
    }

    /// Sleep this long inside every fetch, to widen race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_records(self, source_id: &str, records: Vec<ResultRecord>) -> Self {
        self.set_records(source_id, records);
        self
    }

    pub fn failing(self, source_id: &str) -> Self {
        self.set_failing(source_id);
        self
    }

    pub fn set_records(&self, source_id: &str, records: Vec<ResultRecord>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(source_id.to_string(), Script::Records(records));
    }

    pub fn set_failing(&self, source_id: &str) {
        self.scripts.lock().unwrap().insert(
            source_id.to_string(),
            Script::Fail(FetchError::unavailable(source_id, "scripted outage")),
        );
    }

    /// Total fetches across all sources.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, source_id: &str) -> usize {
        self.calls_by_source
            .lock()
            .unwrap()
            .get(source_id)
            .copied()
            .unwrap_or(0)
    }
}

impl Default for ScriptedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IContentFetcher for ScriptedFetcher {
    fn fetch(
        &self,
        source_id: &str,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<ResultRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .calls_by_source
            .lock()
            .unwrap()
            .entry(source_id.to_string())
            .or_insert(0) += 1;

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        match self.scripts.lock().unwrap().get(source_id) {
            Some(Script::Fail(err)) => Err(err.clone()),
            Some(Script::Records(recs)) => Ok(recs.iter().take(max_results).cloned().collect()),
            None => Ok(records(source_id, 3.min(max_results))),
        }
    }
}

/// Risk store whose every call fails, for fail-closed checks.
pub struct UnavailableRiskStore;

impl IRiskEventStore for UnavailableRiskStore {
    fn put(&self, _event: &RiskEvent) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable {
            reason: "store offline".to_string(),
        })
    }

    fn get_history(&self, _session_id: &str) -> Result<Vec<RiskEvent>, PersistenceError> {
        Err(PersistenceError::Unavailable {
            reason: "store offline".to_string(),
        })
    }
}

/// Completion provider that echoes the prompt it was given.
#[derive(Default)]
pub struct EchoCompletionProvider {
    prompts: Mutex<Vec<String>>,
}

impl EchoCompletionProvider {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ICompletionProvider for EchoCompletionProvider {
    fn complete(&self, prompt: &str) -> KairosResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(format!("echo: {prompt}"))
    }

    fn name(&self) -> &str {
        "echo"
    }
}
