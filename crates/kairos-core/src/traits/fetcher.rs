use crate::errors::FetchError;
use crate::models::ResultRecord;

/// Retrieves raw content for a source. Invoked by the content cache on miss.
///
/// Implementations are typically network bound and may be rate limited.
pub trait IContentFetcher: Send + Sync {
    /// Fetch up to `max_results` records for `query` from `source_id`,
    /// in provider relevance order.
    fn fetch(
        &self,
        source_id: &str,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<ResultRecord>, FetchError>;
}
