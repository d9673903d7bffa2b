use crate::errors::KairosResult;

/// Opaque text-completion capability used by the session layer once
/// retrieval has produced grounding content.
pub trait ICompletionProvider: Send + Sync {
    fn complete(&self, prompt: &str) -> KairosResult<String>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
