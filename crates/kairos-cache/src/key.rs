use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());

/// Canonical query form: trimmed, lowercased, inner whitespace collapsed.
pub fn normalize_query(query: &str) -> String {
    let trimmed = query.trim();
    match WHITESPACE.as_ref() {
        Some(re) => re.replace_all(trimmed, " ").to_lowercase(),
        None => trimmed.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase(),
    }
}

/// Identity of a cache entry: `(source_id, normalized query)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    source_id: String,
    query: String,
}

impl CacheKey {
    pub fn new(source_id: &str, query: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            query: normalize_query(query),
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source_id, self.query)
    }
}
