//! In-Memory Adjacency Store (for testing)
//!
//! DashMap-backed; nothing survives the process. Writes are validated exactly
//! like the SQLite adapter so tests catch unencodable identifiers.

use dashmap::DashMap;

use crate::domain::{decode_list, validate_ids, AdjacencyStore, Relation};
use crate::Result;

#[derive(Default)]
pub struct InMemoryAdjacencyStore {
    paragraph_entities: DashMap<String, Vec<String>>,
    entity_paragraphs: DashMap<String, Vec<String>>,
}

impl InMemoryAdjacencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from space-joined adjacency lists (the persisted encoding).
    ///
    /// ```rust
    /// use entitygraph_storage::{AdjacencyStore, InMemoryAdjacencyStore, Relation};
    ///
    /// let store = InMemoryAdjacencyStore::from_lists(&[("p1", "e1")], &[("e1", "p1")]);
    /// assert_eq!(
    ///     store.get(Relation::EntityParagraphs, "e1").unwrap(),
    ///     Some(vec!["p1".to_string()])
    /// );
    /// ```
    pub fn from_lists(paragraphs: &[(&str, &str)], entities: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (key, list) in paragraphs {
            store
                .paragraph_entities
                .insert(key.to_string(), decode_list(list));
        }
        for (key, list) in entities {
            store
                .entity_paragraphs
                .insert(key.to_string(), decode_list(list));
        }
        store
    }

    fn map(&self, relation: Relation) -> &DashMap<String, Vec<String>> {
        match relation {
            Relation::ParagraphEntities => &self.paragraph_entities,
            Relation::EntityParagraphs => &self.entity_paragraphs,
        }
    }
}

impl AdjacencyStore for InMemoryAdjacencyStore {
    fn get(&self, relation: Relation, key: &str) -> Result<Option<Vec<String>>> {
        Ok(self.map(relation).get(key).map(|entry| entry.value().clone()))
    }

    fn put(&self, relation: Relation, key: &str, ids: &[String]) -> Result<()> {
        validate_ids(key, ids)?;
        self.map(relation).insert(key.to_string(), ids.to_vec());
        Ok(())
    }

    fn put_batch(&self, relation: Relation, entries: &[(String, Vec<String>)]) -> Result<()> {
        for (key, ids) in entries {
            validate_ids(key, ids)?;
        }
        let map = self.map(relation);
        for (key, ids) in entries {
            map.insert(key.clone(), ids.clone());
        }
        Ok(())
    }

    fn checkpoint(&self) -> Result<()> {
        Ok(())
    }

    fn key_count(&self, relation: Relation) -> Result<usize> {
        Ok(self.map(relation).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_is_all_or_nothing_on_invalid_ids() {
        let store = InMemoryAdjacencyStore::new();
        let result = store.put_batch(
            Relation::ParagraphEntities,
            &[
                ("p1".to_string(), vec!["e1".to_string()]),
                ("p2".to_string(), vec!["bad id".to_string()]),
            ],
        );

        assert!(result.is_err());
        assert_eq!(store.key_count(Relation::ParagraphEntities).unwrap(), 0);
    }

    #[test]
    fn test_last_write_wins() {
        let store = InMemoryAdjacencyStore::new();
        store
            .put(Relation::EntityParagraphs, "e1", &["p1".to_string()])
            .unwrap();
        store
            .put(Relation::EntityParagraphs, "e1", &["p2".to_string()])
            .unwrap();

        assert_eq!(
            store.get(Relation::EntityParagraphs, "e1").unwrap(),
            Some(vec!["p2".to_string()])
        );
    }
}
