//! Worker pool
//!
//! A dedicated rayon pool per builder / service instead of the global one, so a
//! build and concurrent query traffic never share worker threads.
//!
//! ```text
//! items ──► fan-out (par_iter on the pool) ──► f(item) ──► fan-in (input order)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::ParallelSettings;
use crate::errors::{MixtureError, Result};

/// Cooperative cancellation flag shared between a caller and long-running work
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Bounded pool of named worker threads
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(settings: &ParallelSettings) -> Result<Self> {
        Self::build(settings.effective_workers(), settings.stack_size_mb)
    }

    /// Pool with `workers` threads (`0` = one per CPU) and the default stack size
    pub fn with_workers(workers: usize) -> Result<Self> {
        let settings = ParallelSettings::default().num_workers(workers);
        Self::new(&settings)
    }

    fn build(workers: usize, stack_size_mb: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .stack_size(stack_size_mb * 1024 * 1024)
            .thread_name(|i| format!("entitygraph-worker-{}", i))
            .build()
            .map_err(|e| MixtureError::Pool(format!("Failed to configure thread pool: {}", e)))?;

        tracing::debug!(workers, stack_size_mb, "worker pool ready");
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Apply `f` to every item on the pool; results come back in input order
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        self.pool.install(|| items.par_iter().map(&f).collect())
    }

    pub fn for_each<T, F>(&self, items: &[T], f: F)
    where
        T: Sync,
        F: Fn(&T) + Sync + Send,
    {
        self.pool.install(|| items.par_iter().for_each(&f))
    }

    /// Run an arbitrary closure inside the pool
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_preserves_order() {
        let pool = WorkerPool::with_workers(4).unwrap();
        let items: Vec<u64> = (0..1_000).collect();

        let squared = pool.map(&items, |x| x * x);

        assert_eq!(squared.len(), 1_000);
        for (i, v) in squared.iter().enumerate() {
            assert_eq!(*v, (i as u64) * (i as u64));
        }
    }

    #[test]
    fn test_map_empty() {
        let pool = WorkerPool::with_workers(2).unwrap();
        let out: Vec<u32> = pool.map(&Vec::<u32>::new(), |x| *x);
        assert!(out.is_empty());
    }

    #[test]
    fn test_for_each_visits_every_item() {
        let pool = WorkerPool::with_workers(3).unwrap();
        let items: Vec<usize> = (1..=100).collect();
        let sum = std::sync::atomic::AtomicUsize::new(0);

        pool.for_each(&items, |x| {
            sum.fetch_add(*x, Ordering::Relaxed);
        });

        assert_eq!(sum.into_inner(), 5050);
    }

    #[test]
    fn test_auto_workers() {
        let pool = WorkerPool::with_workers(0).unwrap();
        assert_eq!(pool.workers(), num_cpus::get());
    }

    #[test]
    fn test_threads_are_named() {
        let pool = WorkerPool::with_workers(1).unwrap();
        let name = pool.install(|| std::thread::current().name().map(str::to_string));
        assert_eq!(name.as_deref(), Some("entitygraph-worker-0"));
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
