use serde::{Deserialize, Serialize};

/// One unit of content returned by a source for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub title: String,
    pub body: String,
    /// Provider-side reference (DOI, section number, URL).
    #[serde(default)]
    pub citation: Option<String>,
    /// blake3 of title + body, used for cross-source deduplication.
    pub content_hash: String,
}

impl ResultRecord {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let body = body.into();
        let content_hash = content_hash(&title, &body);
        Self {
            title,
            body,
            citation: None,
            content_hash,
        }
    }

    pub fn with_citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = Some(citation.into());
        self
    }
}

/// Hash title and body with a separator so ("ab", "c") != ("a", "bc").
pub fn content_hash(title: &str, body: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(title.as_bytes());
    hasher.update(&[0u8]);
    hasher.update(body.as_bytes());
    hasher.finalize().to_hex().to_string()
}
