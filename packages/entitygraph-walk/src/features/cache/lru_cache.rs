//! Strict LRU bound

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use prometheus::Registry;
use tracing::debug;

use super::metrics::CacheMetrics;
use super::types::{AdjacencyCache, ParagraphList};
use crate::config::CachePolicy;

pub struct BoundedLruCache {
    entries: Mutex<LruCache<String, ParagraphList>>,
    metrics: CacheMetrics,
}

impl BoundedLruCache {
    pub fn new(capacity: usize, registry: &Registry) -> Result<Self, prometheus::Error> {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            metrics: CacheMetrics::new(registry)?,
        })
    }
}

impl AdjacencyCache for BoundedLruCache {
    fn get(&self, entity: &str) -> Option<ParagraphList> {
        // `get` promotes the entry, so it needs the lock exclusively
        let found = self.entries.lock().get(entity).cloned();
        self.metrics.record_lookup(found.is_some());
        found
    }

    fn insert(&self, entity: String, paragraphs: ParagraphList) {
        let mut entries = self.entries.lock();
        if let Some((evicted, _)) = entries.push(entity.clone(), paragraphs) {
            if evicted != entity {
                self.metrics.evictions.inc();
                debug!(entity = %evicted, "adjacency cache evicted (lru)");
            }
        }
        self.metrics.entries.set(entries.len() as i64);
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    fn policy(&self) -> CachePolicy {
        CachePolicy::Lru
    }
}
