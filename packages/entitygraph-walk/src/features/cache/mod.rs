//! Entity → paragraphs adjacency cache
//!
//! Three interchangeable policies behind `AdjacencyCache`:
//!
//! - **Unbounded**: DashMap, never evicts (grows with the touched entity set)
//! - **Lru**: `lru::LruCache` behind a mutex, strict entry-count bound
//! - **Adaptive**: moka, entry-count bound plus optional TTL
//!
//! Hit/miss/eviction counters are registered on a caller-supplied Prometheus
//! registry.

mod adaptive_cache;
mod lru_cache;
mod metrics;
mod types;
mod unbounded;

use std::sync::Arc;
use std::time::Duration;

use prometheus::Registry;

pub use adaptive_cache::AdaptiveCache;
pub use lru_cache::BoundedLruCache;
pub use metrics::CacheMetrics;
pub use types::{AdjacencyCache, ParagraphList};
pub use unbounded::UnboundedCache;

use crate::config::{CachePolicy, CacheSettings};

/// Build the cache selected by `settings`
pub fn build_cache(
    settings: &CacheSettings,
    registry: &Registry,
) -> Result<Arc<dyn AdjacencyCache>, prometheus::Error> {
    let cache: Arc<dyn AdjacencyCache> = match settings.policy {
        CachePolicy::Unbounded => Arc::new(UnboundedCache::new(registry)?),
        CachePolicy::Lru => Arc::new(BoundedLruCache::new(
            settings.capacity as usize,
            registry,
        )?),
        CachePolicy::Adaptive => Arc::new(AdaptiveCache::new(
            settings.capacity,
            settings.ttl_secs.map(Duration::from_secs),
            registry,
        )?),
    };
    tracing::debug!(policy = ?settings.policy, capacity = settings.capacity, "adjacency cache ready");
    Ok(cache)
}
