//! Pruned, normalized entity distributions

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Entity id → probability, ordered by probability descending then id ascending.
///
/// Either empty, or sums to 1.0 within floating-point tolerance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityDistribution(Vec<(String, f64)>);

impl EntityDistribution {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keep the `top_k` highest raw scores and rescale them to sum to one.
    ///
    /// Ties at the cut are broken by entity id so the result does not depend on
    /// hash-map iteration order. A zero or non-finite retained total gives an
    /// empty distribution.
    pub fn from_scores(scores: HashMap<String, f64>, top_k: usize) -> Self {
        let mut ranked: Vec<(String, f64)> = scores
            .into_iter()
            .filter(|(_, score)| *score > 0.0)
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(top_k);

        let total: f64 = ranked.iter().map(|(_, score)| score).sum();
        if total <= 0.0 || !total.is_finite() {
            return Self::empty();
        }

        for (_, score) in ranked.iter_mut() {
            *score /= total;
        }
        Self(ranked)
    }

    /// Wrap entries that are already normalized (e.g. loaded from the store)
    pub fn from_entries(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, entity: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(id, _)| id == entity)
            .map(|(_, p)| *p)
    }

    pub fn total(&self) -> f64 {
        self.0.iter().map(|(_, p)| p).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(id, p)| (id.as_str(), *p))
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.0
    }
}
