//! Size + TTL bound (moka)

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use prometheus::Registry;
use tracing::debug;

use super::metrics::CacheMetrics;
use super::types::{AdjacencyCache, ParagraphList};
use crate::config::CachePolicy;

pub struct AdaptiveCache {
    /// moka cache (TinyLFU admission, LRU eviction, optional TTL)
    cache: Cache<String, ParagraphList>,
    metrics: CacheMetrics,
}

impl AdaptiveCache {
    pub fn new(
        capacity: u64,
        ttl: Option<Duration>,
        registry: &Registry,
    ) -> Result<Self, prometheus::Error> {
        let metrics = CacheMetrics::new(registry)?;
        let evictions = metrics.evictions.clone();

        let mut builder = Cache::<String, ParagraphList>::builder()
            .max_capacity(capacity)
            .eviction_listener(move |key: Arc<String>, _value, cause| {
                if cause.was_evicted() {
                    evictions.inc();
                    debug!(entity = %key, ?cause, "adjacency cache evicted");
                }
            });
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }

        Ok(Self {
            cache: builder.build(),
            metrics,
        })
    }

    /// Apply pending evictions and expirations now
    pub fn sync(&self) {
        self.cache.run_pending_tasks();
    }
}

impl AdjacencyCache for AdaptiveCache {
    fn get(&self, entity: &str) -> Option<ParagraphList> {
        let found = self.cache.get(entity);
        self.metrics.record_lookup(found.is_some());
        found
    }

    fn insert(&self, entity: String, paragraphs: ParagraphList) {
        self.cache.insert(entity, paragraphs);
        self.metrics.entries.set(self.cache.entry_count() as i64);
    }

    fn len(&self) -> usize {
        self.sync();
        self.cache.entry_count() as usize
    }

    fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    fn policy(&self) -> CachePolicy {
        CachePolicy::Adaptive
    }
}
