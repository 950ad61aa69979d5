//! Custom assertions for distributions and stores

use entitygraph_storage::{encode_list, AdjacencyStore, Relation};
use entitygraph_walk::EntityDistribution;

/// Non-empty, at most `top_k` entries, sums to one within 1e-9
pub fn assert_normalized(dist: &EntityDistribution, top_k: usize) {
    assert!(!dist.is_empty(), "expected a non-empty distribution");
    assert!(
        dist.len() <= top_k,
        "expected at most {top_k} entries, got {}",
        dist.len()
    );
    let total = dist.total();
    assert!(
        (total - 1.0).abs() < 1e-9,
        "expected total 1.0, got {total}: {:?}",
        dist.entries()
    );
    assert!(dist.iter().all(|(_, p)| p > 0.0 && p <= 1.0));
}

/// Encoded lists for `keys`, for byte-level comparison between stores
pub fn encoded_lists(
    store: &dyn AdjacencyStore,
    relation: Relation,
    keys: &[String],
) -> Vec<(String, Option<String>)> {
    keys.iter()
        .map(|key| {
            let encoded = store
                .get(relation, key)
                .unwrap()
                .map(|list| encode_list(&list));
            (key.clone(), encoded)
        })
        .collect()
}
