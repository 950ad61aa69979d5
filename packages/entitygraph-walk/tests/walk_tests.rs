//! Random walks and batch mixtures on toy graphs

mod common;

use std::sync::Arc;

use common::*;
use entitygraph_storage::{InMemoryAdjacencyStore, Relation};
use entitygraph_walk::config::{FailurePolicy, WalkParams, WalkSettings};
use entitygraph_walk::{MixtureError, MixtureService, WorkerPool};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn service(store: InMemoryAdjacencyStore, index: FakeParagraphIndex) -> MixtureService {
    let engine = engine_for(store, WalkSettings::default().seed(5));
    let pool = Arc::new(WorkerPool::with_workers(4).unwrap());
    MixtureService::new(engine, Arc::new(index), pool)
}

/// p1 and p2 are walkable; p3 has an empty entity list
fn three_candidates() -> (InMemoryAdjacencyStore, FakeParagraphIndex) {
    let store = InMemoryAdjacencyStore::from_lists(
        &[("p1", "e1 e2"), ("p2", "e1"), ("p3", "")],
        &[("e1", "p1 p2"), ("e2", "p1")],
    );
    let records: &[(&str, &str, &[&str])] = &[
        ("p1", "first", &["e1", "e2"]),
        ("p2", "second", &["e1"]),
        ("p3", "third", &[]),
    ];
    (store, FakeParagraphIndex::new(records))
}

#[test]
fn test_single_edge_graph_gives_certainty() {
    let engine = engine_for(toy_single_edge(), WalkSettings::default());
    let dist = engine.walk_paragraph("p1").unwrap();
    assert_eq!(dist.entries(), &[("e1".to_string(), 1.0)]);
}

#[test]
fn test_shared_entity_dominates_across_runs() {
    let engine = engine_for(toy_two_paragraphs(), WalkSettings::default());
    for seed in 0..5 {
        let outcome = engine
            .walk_paragraph_with("p1", WalkParams::new(5_000, 3), &mut StdRng::seed_from_u64(seed))
            .unwrap();
        let dist = outcome.distribution;
        assert!(
            dist.get("e1").unwrap() > dist.get("e2").unwrap(),
            "seed {seed}: {:?}",
            dist.entries()
        );
    }
}

#[test]
fn test_default_walk_is_normalized() {
    let engine = engine_for(toy_two_paragraphs(), WalkSettings::default());
    assert_normalized(&engine.walk_paragraph("p2").unwrap(), 20);
    assert_normalized(&engine.walk_entity("e2").unwrap(), 20);
}

#[test]
fn test_empty_origin_is_missing_adjacency() {
    let (store, _) = three_candidates();
    let engine = engine_for(store, WalkSettings::default());
    let err = engine.walk_paragraph("p3").unwrap_err();
    assert!(matches!(
        err,
        MixtureError::MissingAdjacency { ref node, relation: Relation::ParagraphEntities } if node == "p3"
    ));
}

#[test]
fn test_unknown_entity_origin() {
    let engine = engine_for(toy_single_edge(), WalkSettings::default());
    assert!(matches!(
        engine.walk_entity("e404"),
        Err(MixtureError::MissingAdjacency {
            relation: Relation::EntityParagraphs,
            ..
        })
    ));
}

#[test]
fn test_top_k_bounds_distribution() {
    // one paragraph mentioning 30 entities, each pointing back
    let entities: Vec<String> = (0..30).map(|i| format!("e{i:02}")).collect();
    let joined = entities.join(" ");
    let back: Vec<(&str, &str)> = entities.iter().map(|e| (e.as_str(), "p1")).collect();
    let store = InMemoryAdjacencyStore::from_lists(&[("p1", joined.as_str())], &back);

    let engine = engine_for(store, WalkSettings::default().top_k(20));
    let dist = engine.walk_paragraph("p1").unwrap();
    assert_eq!(dist.len(), 20);
    assert_normalized(&dist, 20);
}

#[test]
fn test_empty_batch() {
    let (store, index) = three_candidates();
    assert!(service(store, index).mixtures(&[]).unwrap().is_empty());
}

#[test]
fn test_order_preserved_when_candidate_omitted() {
    let (store, index) = three_candidates();
    let mixtures = service(store, index)
        .mixtures(&[(1, 0.9), (2, 0.8), (0, 0.7)])
        .unwrap();

    let order: Vec<(&str, f64)> = mixtures
        .iter()
        .map(|m| (m.paragraph_id.as_str(), m.retrieval_score))
        .collect();
    assert_eq!(order, vec![("p2", 0.9), ("p1", 0.7)]);
    assert_eq!(mixtures[0].doc_id, 1);
    assert_eq!(mixtures[1].doc_id, 0);
}

#[test]
fn test_empty_distribution_policy_keeps_candidate() {
    let (store, index) = three_candidates();
    let mixtures = service(store, index)
        .with_failure_policy(FailurePolicy::EmptyDistribution)
        .mixtures(&[(2, 0.8), (0, 0.7)])
        .unwrap();

    assert_eq!(mixtures.len(), 2);
    assert_eq!(mixtures[0].paragraph_id, "p3");
    assert!(mixtures[0].distribution.is_empty());
    assert!(!mixtures[1].distribution.is_empty());
}

#[test]
fn test_strict_policy_fails_batch() {
    let (store, index) = three_candidates();
    let err = service(store, index)
        .with_failure_policy(FailurePolicy::Strict)
        .mixtures(&[(0, 0.7), (2, 0.8)])
        .unwrap_err();
    assert!(err.is_per_origin());
}

#[test]
fn test_index_errors_always_surface() {
    let (store, index) = three_candidates();
    let err = service(store, index.failing_at(0))
        .mixtures(&[(0, 0.7), (1, 0.5)])
        .unwrap_err();
    assert!(matches!(err, MixtureError::IndexAccess { ref id, .. } if id == "0"));
}

#[test]
fn test_paragraph_mixture_carries_score() {
    let (store, index) = three_candidates();
    let mixture = service(store, index).paragraph_mixture(1, 3.5).unwrap();
    assert_eq!(mixture.paragraph_id, "p2");
    assert_eq!(mixture.retrieval_score, 3.5);
    assert_normalized(&mixture.distribution, 20);
}

#[test]
fn test_search_mixtures() {
    let (store, index) = three_candidates();
    let mixtures = service(store, index).search_mixtures("second", 10).unwrap();
    assert_eq!(mixtures.len(), 1);
    assert_eq!(mixtures[0].paragraph_id, "p2");
}
