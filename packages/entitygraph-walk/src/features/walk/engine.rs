//! Restart random walks over the bipartite graph
//!
//! ```text
//! walk_paragraph:  p0 ─► e ─► p ─► e ─► p ...   (counts entities picked)
//! walk_entity:     e0 ─► p ─► e ─► p ─► e ...   (counts entities reached)
//! ```
//!
//! Every trial restarts at the origin with score 1.0. The score is decayed by
//! `fan_out_penalty` after every hop except the first one of each trial.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use entitygraph_storage::{AdjacencyStore, Relation};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::domain::{fan_out_penalty, TrialVisits, WalkOutcome};
use crate::config::{WalkParams, WalkSettings};
use crate::errors::{MixtureError, Result};
use crate::features::cache::{AdjacencyCache, ParagraphList};
use crate::shared::models::EntityDistribution;

pub struct WalkEngine {
    store: Arc<dyn AdjacencyStore>,
    cache: Arc<dyn AdjacencyCache>,
    settings: WalkSettings,
}

impl WalkEngine {
    pub fn new(
        store: Arc<dyn AdjacencyStore>,
        cache: Arc<dyn AdjacencyCache>,
        settings: WalkSettings,
    ) -> Self {
        Self {
            store,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &WalkSettings {
        &self.settings
    }

    pub fn cache(&self) -> &Arc<dyn AdjacencyCache> {
        &self.cache
    }

    /// Walk from a paragraph with the configured parameters
    pub fn walk_paragraph(&self, paragraph_id: &str) -> Result<EntityDistribution> {
        let params = self.settings.paragraph;
        let outcome = match self.settings.seed {
            Some(seed) => {
                self.walk_paragraph_with(paragraph_id, params, &mut StdRng::seed_from_u64(seed))?
            }
            None => self.walk_paragraph_with(paragraph_id, params, &mut rand::thread_rng())?,
        };
        Ok(outcome.distribution)
    }

    /// Walk from an entity with the configured parameters
    pub fn walk_entity(&self, entity_id: &str) -> Result<EntityDistribution> {
        let params = self.settings.entity;
        let outcome = match self.settings.seed {
            Some(seed) => {
                self.walk_entity_with(entity_id, params, &mut StdRng::seed_from_u64(seed))?
            }
            None => self.walk_entity_with(entity_id, params, &mut rand::thread_rng())?,
        };
        Ok(outcome.distribution)
    }

    /// Paragraph → entity → paragraph ... walk with explicit parameters.
    ///
    /// Fails with `MissingAdjacency` when the origin has no stored entities.
    pub fn walk_paragraph_with<R: Rng + ?Sized>(
        &self,
        origin: &str,
        params: WalkParams,
        rng: &mut R,
    ) -> Result<WalkOutcome> {
        let origin_entities = self
            .paragraph_entities(origin)?
            .filter(|list| !list.is_empty())
            .ok_or_else(|| MixtureError::missing(origin, Relation::ParagraphEntities))?;

        let mut counts: HashMap<String, f64> = HashMap::new();
        let mut abandoned = 0;

        for _ in 0..params.n_walks {
            let mut visits = TrialVisits::with_capacity(params.n_steps);
            let mut score = 1.0;
            let mut current: Cow<'_, str> = Cow::Borrowed(origin);
            let mut completed = true;

            for hop in 0..params.n_steps {
                let entities: Cow<'_, [String]> = if current == origin {
                    Cow::Borrowed(origin_entities.as_slice())
                } else {
                    match self.paragraph_entities(&current)? {
                        Some(list) if !list.is_empty() => Cow::Owned(list),
                        _ => {
                            completed = false;
                            break;
                        }
                    }
                };
                let Some(entity) = entities.choose(rng) else {
                    completed = false;
                    break;
                };

                let paragraphs = match self.entity_paragraphs(entity)? {
                    Some(list) if !list.is_empty() => list,
                    _ => {
                        completed = false;
                        break;
                    }
                };
                let Some(next) = paragraphs.choose(rng) else {
                    completed = false;
                    break;
                };

                visits.visit(entity, score);
                if hop > 0 {
                    score *= fan_out_penalty(entities.len(), paragraphs.len());
                }
                current = Cow::Owned(next.clone());
            }

            if completed {
                visits.merge_into(&mut counts);
            } else {
                abandoned += 1;
            }
        }

        Ok(self.finish(origin, params, counts, abandoned))
    }

    /// Entity → paragraph → entity ... walk with explicit parameters.
    ///
    /// Fails with `MissingAdjacency` when the origin has no stored paragraphs.
    pub fn walk_entity_with<R: Rng + ?Sized>(
        &self,
        origin: &str,
        params: WalkParams,
        rng: &mut R,
    ) -> Result<WalkOutcome> {
        let origin_paragraphs = self
            .entity_paragraphs(origin)?
            .filter(|list| !list.is_empty())
            .ok_or_else(|| MixtureError::missing(origin, Relation::EntityParagraphs))?;

        let mut counts: HashMap<String, f64> = HashMap::new();
        let mut abandoned = 0;

        for _ in 0..params.n_walks {
            let mut visits = TrialVisits::with_capacity(params.n_steps);
            let mut score = 1.0;
            let mut current: Cow<'_, str> = Cow::Borrowed(origin);
            let mut completed = true;

            for hop in 0..params.n_steps {
                let paragraphs = if current == origin {
                    Arc::clone(&origin_paragraphs)
                } else {
                    match self.entity_paragraphs(&current)? {
                        Some(list) if !list.is_empty() => list,
                        _ => {
                            completed = false;
                            break;
                        }
                    }
                };
                let Some(paragraph) = paragraphs.choose(rng) else {
                    completed = false;
                    break;
                };

                let entities = match self.paragraph_entities(paragraph)? {
                    Some(list) if !list.is_empty() => list,
                    _ => {
                        completed = false;
                        break;
                    }
                };
                let Some(next) = entities.choose(rng) else {
                    completed = false;
                    break;
                };

                visits.visit(next, score);
                if hop > 0 {
                    score *= fan_out_penalty(paragraphs.len(), entities.len());
                }
                current = Cow::Owned(next.clone());
            }

            if completed {
                visits.merge_into(&mut counts);
            } else {
                abandoned += 1;
            }
        }

        Ok(self.finish(origin, params, counts, abandoned))
    }

    fn finish(
        &self,
        origin: &str,
        params: WalkParams,
        counts: HashMap<String, f64>,
        abandoned: usize,
    ) -> WalkOutcome {
        let visited = counts.len();
        let distribution = EntityDistribution::from_scores(counts, self.settings.top_k);
        debug!(
            origin,
            n_walks = params.n_walks,
            n_steps = params.n_steps,
            visited,
            kept = distribution.len(),
            abandoned,
            "walk finished"
        );

        WalkOutcome {
            distribution,
            completed_trials: params.n_walks - abandoned,
            abandoned_trials: abandoned,
        }
    }

    /// Paragraph → entities, always read from the store
    fn paragraph_entities(&self, paragraph: &str) -> Result<Option<Vec<String>>> {
        Ok(self.store.get(Relation::ParagraphEntities, paragraph)?)
    }

    /// Entity → paragraphs through the cache. Absent keys are not cached.
    fn entity_paragraphs(&self, entity: &str) -> Result<Option<ParagraphList>> {
        if let Some(hit) = self.cache.get(entity) {
            return Ok(Some(hit));
        }
        match self.store.get(Relation::EntityParagraphs, entity)? {
            Some(list) => {
                let list = Arc::new(list);
                self.cache.insert(entity.to_string(), Arc::clone(&list));
                Ok(Some(list))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheSettings;
    use crate::features::cache::build_cache;
    use entitygraph_storage::InMemoryAdjacencyStore;
    use prometheus::Registry;

    fn engine(store: InMemoryAdjacencyStore) -> WalkEngine {
        let cache = build_cache(&CacheSettings::default(), &Registry::new()).unwrap();
        WalkEngine::new(Arc::new(store), cache, WalkSettings::default().seed(7))
    }

    #[test]
    fn test_single_edge_graph_is_certain() {
        let engine = engine(InMemoryAdjacencyStore::from_lists(
            &[("p1", "e1")],
            &[("e1", "p1")],
        ));
        let dist = engine.walk_paragraph("p1").unwrap();
        assert_eq!(dist.entries(), &[("e1".to_string(), 1.0)]);
    }

    #[test]
    fn test_missing_origin() {
        let engine = engine(InMemoryAdjacencyStore::new());
        let err = engine.walk_paragraph("nope").unwrap_err();
        assert!(matches!(
            err,
            MixtureError::MissingAdjacency {
                relation: Relation::ParagraphEntities,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_origin_list_is_missing() {
        let engine = engine(InMemoryAdjacencyStore::from_lists(&[("p1", "")], &[]));
        assert!(engine.walk_paragraph("p1").unwrap_err().is_per_origin());
    }

    #[test]
    fn test_dead_end_abandons_trial() {
        // e1 leads to p2, which has no entity list
        let engine = engine(InMemoryAdjacencyStore::from_lists(
            &[("p1", "e1")],
            &[("e1", "p2")],
        ));
        let outcome = engine
            .walk_paragraph_with("p1", WalkParams::new(10, 3), &mut StdRng::seed_from_u64(1))
            .unwrap();

        assert_eq!(outcome.abandoned_trials, 10);
        assert_eq!(outcome.completed_trials, 0);
        assert!(outcome.distribution.is_empty());
    }

    #[test]
    fn test_single_hop_walk_counts_without_decay() {
        let engine = engine(InMemoryAdjacencyStore::from_lists(
            &[("p1", "e1 e2")],
            &[("e1", "p1"), ("e2", "p1")],
        ));
        let outcome = engine
            .walk_paragraph_with("p1", WalkParams::new(50, 1), &mut StdRng::seed_from_u64(3))
            .unwrap();

        assert_eq!(outcome.completed_trials, 50);
        assert!((outcome.distribution.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_entity_walk_reaches_co_mentioned_entities() {
        let engine = engine(InMemoryAdjacencyStore::from_lists(
            &[("p1", "e1 e2"), ("p2", "e1")],
            &[("e1", "p1 p2"), ("e2", "p1")],
        ));
        let dist = engine.walk_entity("e2").unwrap();

        assert!(dist.get("e1").is_some());
        assert!(dist.get("e2").is_some());
        assert!((dist.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_entity_lists_go_through_cache() {
        let engine = engine(InMemoryAdjacencyStore::from_lists(
            &[("p1", "e1")],
            &[("e1", "p1")],
        ));
        engine.walk_paragraph("p1").unwrap();

        let metrics = engine.cache().metrics();
        assert_eq!(metrics.misses.get(), 1);
        assert!(metrics.hits.get() > 0);
    }

    #[test]
    fn test_missing_entity_is_not_cached() {
        let engine = engine(InMemoryAdjacencyStore::from_lists(&[("p1", "e9")], &[]));
        let outcome = engine
            .walk_paragraph_with("p1", WalkParams::new(3, 2), &mut StdRng::seed_from_u64(0))
            .unwrap();

        assert_eq!(outcome.abandoned_trials, 3);
        assert!(engine.cache().is_empty());
    }

    /// p1 → e1 → p2 → e2 → p3 → e3 → p1, every list of length two
    fn doubled_chain() -> InMemoryAdjacencyStore {
        InMemoryAdjacencyStore::from_lists(
            &[("p1", "e1 e1"), ("p2", "e2 e2"), ("p3", "e3 e3")],
            &[("e1", "p2 p2"), ("e2", "p3 p3"), ("e3", "p1 p1")],
        )
    }

    fn assert_weights(dist: &EntityDistribution, expected: &[(&str, f64)]) {
        assert_eq!(dist.len(), expected.len());
        for (entity, weight) in expected {
            let got = dist.get(entity).unwrap();
            assert!((got - weight).abs() < 1e-12, "{}: {} != {}", entity, got, weight);
        }
    }

    #[test]
    fn test_first_hop_is_not_decayed_from_paragraph() {
        let engine = engine(doubled_chain());
        let outcome = engine
            .walk_paragraph_with("p1", WalkParams::new(1, 3), &mut StdRng::seed_from_u64(0))
            .unwrap();

        // raw weights: e1 = 1, e2 = 1, e3 = k
        let k = fan_out_penalty(2, 2);
        assert!((k - 1.0 / (2.0 * 2f64.ln())).abs() < 1e-15);
        assert_weights(
            &outcome.distribution,
            &[("e1", 1.0 / (2.0 + k)), ("e2", 1.0 / (2.0 + k)), ("e3", k / (2.0 + k))],
        );
        let ids: Vec<&str> = outcome.distribution.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["e1", "e2", "e3"]);
    }

    #[test]
    fn test_first_hop_is_not_decayed_from_entity() {
        let engine = engine(doubled_chain());
        let outcome = engine
            .walk_entity_with("e1", WalkParams::new(1, 3), &mut StdRng::seed_from_u64(0))
            .unwrap();

        // reached: e2 = 1, e3 = 1, e1 = k
        let k = fan_out_penalty(2, 2);
        assert_weights(
            &outcome.distribution,
            &[("e2", 1.0 / (2.0 + k)), ("e3", 1.0 / (2.0 + k)), ("e1", k / (2.0 + k))],
        );
    }

    #[test]
    fn test_seeded_walks_repeat() {
        let engine = engine(InMemoryAdjacencyStore::from_lists(
            &[("p1", "e1 e2 e3"), ("p2", "e2 e3")],
            &[("e1", "p1"), ("e2", "p1 p2"), ("e3", "p2")],
        ));
        assert_eq!(
            engine.walk_paragraph("p1").unwrap(),
            engine.walk_paragraph("p1").unwrap()
        );
    }
}
