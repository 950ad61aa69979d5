use std::sync::Arc;

use super::metrics::CacheMetrics;
use crate::config::CachePolicy;

/// Cached entity → paragraphs list
pub type ParagraphList = Arc<Vec<String>>;

/// Shared entity → paragraphs cache.
///
/// Lookups are infallible. Compute-if-absent lives in the walk engine: two
/// concurrent misses on one key may both load and both insert, which is harmless
/// because the stored value is identical.
pub trait AdjacencyCache: Send + Sync {
    fn get(&self, entity: &str) -> Option<ParagraphList>;

    fn insert(&self, entity: String, paragraphs: ParagraphList);

    /// Current entry count (bounded policies may lag slightly behind inserts)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn metrics(&self) -> &CacheMetrics;

    fn policy(&self) -> CachePolicy;
}
