mod completion;
mod fetcher;
mod risk_store;
mod scorer;

pub use completion::ICompletionProvider;
pub use fetcher::IContentFetcher;
pub use risk_store::IRiskEventStore;
pub use scorer::{IRelevanceScorer, RelevanceSignals};
