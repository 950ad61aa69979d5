//! Domain layer for the adjacency store
//!
//! # Core Principles
//!
//! 1. **Two relations, one store**: `paragraph → entities` and `entity → paragraphs`
//!    share a backing file but live in separate named collections.
//! 2. **List-valued edges**: every value is an ordered identifier list; duplicates
//!    are kept, multiplicity is the only weight.
//! 3. **Overwrite, never merge**: a later `put` for the same key replaces the list.
//!
//! # Port Trait
//!
//! - `AdjacencyStore`: primary storage abstraction, shared by the graph builder
//!   (writer) and the walk engine (reader).
//!
//! # Examples
//!
//! ```rust,ignore
//! use entitygraph_storage::{AdjacencyStore, Relation, SqliteAdjacencyStore};
//!
//! let store = SqliteAdjacencyStore::open("graph_database.db")?;
//! store.put(Relation::ParagraphEntities, "p1", &["e1".into(), "e2".into()])?;
//!
//! match store.get(Relation::ParagraphEntities, "p1")? {
//!     Some(entities) => println!("{} entities", entities.len()),
//!     None => println!("dangling paragraph"),
//! }
//! store.close()?;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Result, StorageError};

/// Separator used by the persisted list encoding.
pub const LIST_SEPARATOR: char = ' ';

// ═══════════════════════════════════════════════════════════════════════════
// Relations & Namespaces
// ═══════════════════════════════════════════════════════════════════════════

/// Direction of a bipartite adjacency relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// paragraph id → entity ids mentioned in it
    ParagraphEntities,
    /// entity id → paragraph ids mentioning it
    EntityParagraphs,
}

impl Relation {
    /// Name of the backing collection.
    pub fn collection(&self) -> &'static str {
        match self {
            Relation::ParagraphEntities => "par_map",
            Relation::EntityParagraphs => "entity_map",
        }
    }

    pub fn all() -> [Relation; 2] {
        [Relation::ParagraphEntities, Relation::EntityParagraphs]
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Reserved collections holding precomputed distributions.
///
/// These coexist with the adjacency relations in the same file but are not read
/// by the walk engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionCache {
    /// entity → distribution over entities
    EntityToEntity,
    /// paragraph → distribution over entities
    ParagraphToEntity,
}

impl DistributionCache {
    pub fn collection(&self) -> &'static str {
        match self {
            DistributionCache::EntityToEntity => "e2e_dist",
            DistributionCache::ParagraphToEntity => "p2e_dist",
        }
    }
}

/// Collection holding cached feature weights (`key → f64`).
pub const WEIGHT_COLLECTION: &str = "weight_map";

// ═══════════════════════════════════════════════════════════════════════════
// Port
// ═══════════════════════════════════════════════════════════════════════════

/// Adjacency Store Port (Primary Interface)
///
/// Concurrent reads are always safe. Concurrent writes to distinct keys are safe
/// without external locking; writes to the same key are last-write-wins.
pub trait AdjacencyStore: Send + Sync {
    /// Look up the adjacency list of `key`.
    ///
    /// Returns `Ok(None)` when the key was never written.
    fn get(&self, relation: Relation, key: &str) -> Result<Option<Vec<String>>>;

    /// Write (overwrite) the adjacency list of `key`.
    fn put(&self, relation: Relation, key: &str, ids: &[String]) -> Result<()>;

    /// Write many lists as one durable unit.
    ///
    /// A crash after this returns never loses the batch.
    fn put_batch(&self, relation: Relation, entries: &[(String, Vec<String>)]) -> Result<()>;

    /// Flush committed writes to the main store file.
    fn checkpoint(&self) -> Result<()>;

    /// Number of keys stored for `relation`.
    fn key_count(&self, relation: Relation) -> Result<usize>;
}

// ═══════════════════════════════════════════════════════════════════════════
// List encoding
// ═══════════════════════════════════════════════════════════════════════════

/// Check that every identifier survives the space-joined encoding.
pub fn validate_ids(key: &str, ids: &[String]) -> Result<()> {
    if key.is_empty() || key.contains(LIST_SEPARATOR) {
        return Err(StorageError::invalid_identifier(key, key));
    }
    for id in ids {
        if id.is_empty() || id.contains(LIST_SEPARATOR) {
            return Err(StorageError::invalid_identifier(key, id));
        }
    }
    Ok(())
}

/// Join identifiers with a single space.
pub fn encode_list(ids: &[String]) -> String {
    ids.join(" ")
}

/// Split a stored value back into identifiers. The empty string is the empty list.
pub fn decode_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(LIST_SEPARATOR).map(str::to_string).collect()
}
