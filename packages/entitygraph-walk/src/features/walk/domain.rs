//! Walk domain: trial outcome and fan-out decay

use std::collections::HashMap;

use crate::shared::models::EntityDistribution;

/// Result of one restart-walk run from a single origin
#[derive(Debug, Clone, PartialEq)]
pub struct WalkOutcome {
    pub distribution: EntityDistribution,
    /// Trials that made every hop and were merged
    pub completed_trials: usize,
    /// Trials that hit a missing or empty list mid-walk and were dropped
    pub abandoned_trials: usize,
}

/// Multiplicative decay for one hop through lists of the given lengths.
///
/// `1 / (ln a + ln b)`, or `1.0` when the denominator is not positive
/// (both lists of length one).
pub fn fan_out_penalty(a: usize, b: usize) -> f64 {
    let denominator = (a as f64).ln() + (b as f64).ln();
    if denominator > 0.0 {
        1.0 / denominator
    } else {
        1.0
    }
}

/// Visits of one trial, merged into the aggregate only if the trial completes
#[derive(Debug, Default)]
pub(crate) struct TrialVisits(Vec<(String, f64)>);

impl TrialVisits {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    pub(crate) fn visit(&mut self, entity: &str, score: f64) {
        self.0.push((entity.to_string(), score));
    }

    pub(crate) fn merge_into(self, counts: &mut HashMap<String, f64>) {
        for (entity, score) in self.0 {
            *counts.entry(entity).or_insert(0.0) += score;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_guard_for_unit_lists() {
        assert_eq!(fan_out_penalty(1, 1), 1.0);
    }

    #[test]
    fn test_penalty_value() {
        let expected = 1.0 / (2f64.ln() + 3f64.ln());
        assert!((fan_out_penalty(2, 3) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_penalty_shrinks_with_fan_out() {
        assert!(fan_out_penalty(100, 100) < fan_out_penalty(10, 10));
    }

    #[test]
    fn test_trial_merge_accumulates() {
        let mut counts = HashMap::new();
        let mut trial = TrialVisits::with_capacity(2);
        trial.visit("e1", 1.0);
        trial.visit("e1", 0.5);
        trial.merge_into(&mut counts);
        assert_eq!(counts["e1"], 1.5);
    }
}
