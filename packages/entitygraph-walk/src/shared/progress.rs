//! Progress reporting for long passes

use parking_lot::Mutex;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub done: usize,
    pub failed: usize,
}

/// Mutex-guarded unit counter that logs every `log_every` units
#[derive(Debug)]
pub struct ProgressTracker {
    label: &'static str,
    total: usize,
    log_every: usize,
    state: Mutex<ProgressSnapshot>,
}

impl ProgressTracker {
    pub fn new(label: &'static str, total: usize, log_every: usize) -> Self {
        Self {
            label,
            total,
            log_every: log_every.max(1),
            state: Mutex::new(ProgressSnapshot::default()),
        }
    }

    /// Record `units` finished units, `failed` of which failed
    pub fn record(&self, units: usize, failed: usize) {
        let mut state = self.state.lock();
        let before = state.done / self.log_every;
        state.done += units;
        state.failed += failed;
        if state.done / self.log_every > before || state.done == self.total {
            info!(
                pass = self.label,
                done = state.done,
                total = self.total,
                failed = state.failed,
                "progress"
            );
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        *self.state.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counts_accumulate() {
        let tracker = ProgressTracker::new("paragraphs", 10, 3);
        tracker.record(4, 1);
        tracker.record(6, 0);
        assert_eq!(
            tracker.snapshot(),
            ProgressSnapshot {
                done: 10,
                failed: 1
            }
        );
    }

    #[test]
    fn test_concurrent_updates() {
        let tracker = Arc::new(ProgressTracker::new("entities", 800, 100));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let t = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        t.record(1, 0);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(tracker.snapshot().done, 800);
    }
}
