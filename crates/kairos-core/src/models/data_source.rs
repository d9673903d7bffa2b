use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{CRISIS_SPECIALIZATION, WILDCARD_TAG};

/// Kind of knowledge a source provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    ResearchDatabase,
    Guideline,
    Protocol,
    ClinicalDoc,
    CaseStudy,
    EthicsDoc,
    LegalDoc,
}

impl SourceType {
    pub const ALL: [SourceType; 7] = [
        Self::ResearchDatabase,
        Self::Guideline,
        Self::Protocol,
        Self::ClinicalDoc,
        Self::CaseStudy,
        Self::EthicsDoc,
        Self::LegalDoc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResearchDatabase => "research-database",
            Self::Guideline => "guideline",
            Self::Protocol => "protocol",
            Self::ClinicalDoc => "clinical-doc",
            Self::CaseStudy => "case-study",
            Self::EthicsDoc => "ethics-doc",
            Self::LegalDoc => "legal-doc",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Licensing tier of a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessTier {
    #[default]
    Public,
    Licensed,
    Restricted,
}

/// How a source is reached and how long its content stays fresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceAccess {
    pub tier: AccessTier,
    pub requires_auth: bool,
    /// Requests per minute the provider tolerates, if known.
    pub rate_limit: Option<u32>,
    /// Overrides the cache TTL for this source's content.
    pub cache_duration_secs: Option<u64>,
}

/// A catalogued external knowledge provider.
///
/// `reliability_score` is owned by quality control and is read-only here.
/// Sources are never deleted, only deactivated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub access: SourceAccess,
    #[serde(default)]
    pub specializations: BTreeSet<String>,
    #[serde(default)]
    pub approaches: BTreeSet<String>,
    pub reliability_score: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

fn default_active() -> bool {
    true
}

impl DataSource {
    /// Create an active public source with no tags.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        source_type: SourceType,
        reliability_score: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source_type,
            description: String::new(),
            url: String::new(),
            access: SourceAccess::default(),
            specializations: BTreeSet::new(),
            approaches: BTreeSet::new(),
            reliability_score,
            is_active: true,
            version: None,
            last_updated: None,
        }
    }

    pub fn with_specializations<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.specializations = normalize_tags(tags);
        self
    }

    pub fn with_approaches<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.approaches = normalize_tags(tags);
        self
    }

    pub fn with_access(mut self, access: SourceAccess) -> Self {
        self.access = access;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Whether this source covers the (normalized) specialization tag.
    pub fn matches_specialization(&self, tag: &str) -> bool {
        self.specializations.contains(tag) || self.specializations.contains(WILDCARD_TAG)
    }

    /// Whether this source covers the (normalized) approach tag.
    pub fn matches_approach(&self, tag: &str) -> bool {
        self.approaches.contains(tag) || self.approaches.contains(WILDCARD_TAG)
    }

    /// Crisis-protocol sources are force-included at high risk.
    pub fn is_crisis_source(&self) -> bool {
        self.specializations.contains(CRISIS_SPECIALIZATION)
    }

    /// Per-source cache TTL override, if the access metadata declares one.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.access.cache_duration_secs.map(Duration::from_secs)
    }

    /// Lowercase and trim every tag in place. Applied on catalog load.
    pub fn normalize(&mut self) {
        self.specializations = normalize_tags(&self.specializations);
        self.approaches = normalize_tags(&self.approaches);
    }
}

/// Canonical form of a specialization or approach tag.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Normalize a tag collection, dropping empties.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| normalize_tag(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}
