//! Prometheus metrics for the adjacency cache

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, IntCounter, IntGauge,
    Opts, Registry,
};

/// Adjacency Cache Metrics
#[derive(Clone)]
pub struct CacheMetrics {
    pub hits: IntCounter,
    pub misses: IntCounter,
    pub entries: IntGauge,
    pub evictions: IntCounter,
}

impl CacheMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            hits: register_int_counter_with_registry!(
                Opts::new("entitygraph_cache_hits_total", "Adjacency cache hits"),
                registry
            )?,
            misses: register_int_counter_with_registry!(
                Opts::new("entitygraph_cache_misses_total", "Adjacency cache misses"),
                registry
            )?,
            entries: register_int_gauge_with_registry!(
                Opts::new("entitygraph_cache_entries", "Adjacency cache entry count"),
                registry
            )?,
            evictions: register_int_counter_with_registry!(
                Opts::new(
                    "entitygraph_cache_evictions_total",
                    "Adjacency cache evictions (size or TTL)"
                ),
                registry
            )?,
        })
    }

    pub(crate) fn record_lookup(&self, hit: bool) {
        if hit {
            self.hits.inc();
        } else {
            self.misses.inc();
        }
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.get() as f64;
        let total = hits + self.misses.get() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

impl std::fmt::Debug for CacheMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheMetrics")
            .field("hits", &self.hits.get())
            .field("misses", &self.misses.get())
            .field("entries", &self.entries.get())
            .field("evictions", &self.evictions.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let metrics = CacheMetrics::new(&Registry::new()).unwrap();
        assert_eq!(metrics.hit_rate(), 0.0);

        metrics.record_lookup(true);
        metrics.record_lookup(true);
        metrics.record_lookup(true);
        metrics.record_lookup(false);
        assert!((metrics.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_double_registration_fails() {
        let registry = Registry::new();
        let _first = CacheMetrics::new(&registry).unwrap();
        assert!(CacheMetrics::new(&registry).is_err());
    }
}
