//! Never-evicting cache (DashMap)

use dashmap::DashMap;
use prometheus::Registry;

use super::metrics::CacheMetrics;
use super::types::{AdjacencyCache, ParagraphList};
use crate::config::CachePolicy;

pub struct UnboundedCache {
    entries: DashMap<String, ParagraphList>,
    metrics: CacheMetrics,
}

impl UnboundedCache {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            entries: DashMap::new(),
            metrics: CacheMetrics::new(registry)?,
        })
    }
}

impl AdjacencyCache for UnboundedCache {
    fn get(&self, entity: &str) -> Option<ParagraphList> {
        let found = self.entries.get(entity).map(|e| e.value().clone());
        self.metrics.record_lookup(found.is_some());
        found
    }

    fn insert(&self, entity: String, paragraphs: ParagraphList) {
        self.entries.insert(entity, paragraphs);
        self.metrics.entries.set(self.entries.len() as i64);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    fn policy(&self) -> CachePolicy {
        CachePolicy::Unbounded
    }
}
