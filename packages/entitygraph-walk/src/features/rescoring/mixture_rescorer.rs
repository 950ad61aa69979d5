//! Rescoring ranked candidates by the entity mass they share with the result set

use std::collections::HashMap;

use crate::shared::models::ParagraphMixture;

/// Scores each candidate by how much its entity mass overlaps the mass of the
/// whole candidate list.
///
/// Every mixture deposits `p(e) * retrieval_score` into a per-entity sink; sinks
/// are normalized to sum to one and each mixture then scores
/// `Σ_e p(e) * sink(e)`. Candidates that share the dominant entities of a
/// well-retrieved result set score high.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixtureRescorer;

impl MixtureRescorer {
    pub fn new() -> Self {
        Self
    }

    /// One score per mixture, aligned with the input
    pub fn score(&self, mixtures: &[ParagraphMixture]) -> Vec<f64> {
        let mut sinks: HashMap<&str, f64> = HashMap::new();
        for mixture in mixtures {
            for (entity, p) in mixture.distribution.iter() {
                *sinks.entry(entity).or_insert(0.0) += p * mixture.retrieval_score;
            }
        }

        let total: f64 = sinks.values().sum();
        if total == 0.0 || !total.is_finite() {
            return vec![0.0; mixtures.len()];
        }

        mixtures
            .iter()
            .map(|mixture| {
                mixture
                    .distribution
                    .iter()
                    .map(|(entity, p)| p * sinks.get(entity).copied().unwrap_or(0.0) / total)
                    .sum()
            })
            .collect()
    }
}
