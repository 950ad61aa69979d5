//! Test fixtures: toy graphs, paragraph indexes, engines

use std::collections::HashSet;
use std::sync::Arc;

use entitygraph_storage::InMemoryAdjacencyStore;
use entitygraph_walk::config::{CacheSettings, WalkSettings};
use entitygraph_walk::features::cache::build_cache;
use entitygraph_walk::features::lexical::{IndexError, ParagraphIndex, TantivyParagraphIndex};
use entitygraph_walk::shared::models::{DocOrdinal, StoredParagraph};
use entitygraph_walk::WalkEngine;
use prometheus::Registry;

/// `{p1:[e1], e1:[p1]}`
pub fn toy_single_edge() -> InMemoryAdjacencyStore {
    InMemoryAdjacencyStore::from_lists(&[("p1", "e1")], &[("e1", "p1")])
}

/// `{p1:[e1,e2], p2:[e1], e1:[p1,p2], e2:[p1]}`
pub fn toy_two_paragraphs() -> InMemoryAdjacencyStore {
    InMemoryAdjacencyStore::from_lists(
        &[("p1", "e1 e2"), ("p2", "e1")],
        &[("e1", "p1 p2"), ("e2", "p1")],
    )
}

/// Walk engine over `store` with an unbounded cache on a private registry
pub fn engine_for(store: InMemoryAdjacencyStore, settings: WalkSettings) -> Arc<WalkEngine> {
    let cache = build_cache(
        &CacheSettings::default()
            .policy(entitygraph_walk::config::CachePolicy::Unbounded)
            .ttl_secs(None),
        &Registry::new(),
    )
    .unwrap();
    Arc::new(WalkEngine::new(Arc::new(store), cache, settings))
}

/// Small corpus: (paragraph id, text, entity mentions)
pub const CORPUS: &[(&str, &str, &[&str])] = &[
    ("p1", "the borrow checker enforces ownership", &["Rust", "Ownership"]),
    ("p2", "cargo builds and tests rust crates", &["Rust", "Cargo"]),
    ("p3", "ownership rules prevent data races", &["Ownership", "Concurrency"]),
    ("p4", "threads share data through channels", &["Concurrency"]),
    ("p5", "a paragraph nobody linked", &[]),
    ("p6", "rust rust rust", &["Rust", "Rust"]),
];

/// In-RAM Tantivy index holding `records`, committed once
pub fn paragraph_index(records: &[(&str, &str, &[&str])]) -> TantivyParagraphIndex {
    let index = TantivyParagraphIndex::create_in_ram().unwrap();
    for (id, text, entities) in records {
        let entities: Vec<String> = entities.iter().map(|e| e.to_string()).collect();
        index.add_paragraph(id, text, &entities).unwrap();
    }
    index.commit().unwrap();
    index
}

/// Hand-rolled index: ordinal = position, with injectable per-ordinal failures
#[derive(Default)]
pub struct FakeParagraphIndex {
    docs: Vec<(StoredParagraph, String)>,
    failing: HashSet<DocOrdinal>,
}

impl FakeParagraphIndex {
    pub fn new(records: &[(&str, &str, &[&str])]) -> Self {
        Self {
            docs: records
                .iter()
                .map(|(id, text, entities)| {
                    (
                        StoredParagraph {
                            paragraph_id: id.to_string(),
                            entities: entities.iter().map(|e| e.to_string()).collect(),
                        },
                        text.to_string(),
                    )
                })
                .collect(),
            failing: HashSet::new(),
        }
    }

    /// Reads of `ordinal` fail with an I/O error
    pub fn failing_at(mut self, ordinal: DocOrdinal) -> Self {
        self.failing.insert(ordinal);
        self
    }

    fn read(&self, ordinal: DocOrdinal) -> Result<&StoredParagraph, IndexError> {
        if self.failing.contains(&ordinal) {
            return Err(IndexError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "injected read failure",
            )));
        }
        self.docs
            .get(ordinal as usize)
            .map(|(p, _)| p)
            .ok_or(IndexError::OrdinalOutOfRange {
                ordinal,
                max: self.docs.len() as DocOrdinal,
            })
    }
}

impl ParagraphIndex for FakeParagraphIndex {
    fn max_ordinal(&self) -> DocOrdinal {
        self.docs.len() as DocOrdinal
    }

    fn stored_paragraph(&self, ordinal: DocOrdinal) -> Result<Option<StoredParagraph>, IndexError> {
        self.read(ordinal).map(|p| Some(p.clone()))
    }

    fn entity_terms(&self) -> Result<Vec<String>, IndexError> {
        let mut terms: Vec<String> = self
            .docs
            .iter()
            .flat_map(|(p, _)| p.entities.iter().cloned())
            .collect();
        terms.sort();
        terms.dedup();
        Ok(terms)
    }

    fn term_query(&self, entity: &str, limit: usize) -> Result<Vec<DocOrdinal>, IndexError> {
        Ok(self
            .docs
            .iter()
            .enumerate()
            .filter(|(_, (p, _))| p.entities.iter().any(|e| e == entity))
            .map(|(i, _)| i as DocOrdinal)
            .take(limit)
            .collect())
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<(DocOrdinal, f64)>, IndexError> {
        Ok(self
            .docs
            .iter()
            .enumerate()
            .filter(|(_, (_, text))| text.contains(query))
            .map(|(i, _)| (i as DocOrdinal, 1.0))
            .take(limit)
            .collect())
    }
}
