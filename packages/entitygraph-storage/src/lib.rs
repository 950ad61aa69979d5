//! Entitygraph Storage - persistent bipartite adjacency store
//!
//! > "Build the graph once, walk it many times."
//!
//! ## Core Principles
//!
//! 1. **Two relations**: `paragraph → entities` (`par_map`) and
//!    `entity → paragraphs` (`entity_map`) in one durable file
//! 2. **Explicit absence**: `get` returns `Ok(None)` for unknown keys, never panics
//! 3. **Checkpointed bulk writes**: `put_batch` is the durable unit of a build
//!
//! ## Usage
//!
//! ```rust,ignore
//! use entitygraph_storage::{AdjacencyStore, Relation, SqliteAdjacencyStore};
//!
//! // 1. Build phase (one writer, many batches)
//! let store = SqliteAdjacencyStore::open("graph_database.db")?;
//! store.put_batch(Relation::ParagraphEntities, &batch)?;
//!
//! // 2. Query phase (many concurrent readers)
//! let entities = store.get(Relation::ParagraphEntities, "p1")?;
//!
//! // 3. Shutdown
//! store.close()?;
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{ErrorKind, Result, StorageError};

pub use domain::{
    decode_list, encode_list, AdjacencyStore, DistributionCache, Relation, WEIGHT_COLLECTION,
};

pub use infrastructure::InMemoryAdjacencyStore;

#[cfg(feature = "sqlite")]
pub use infrastructure::{SqliteAdjacencyStore, SqliteOptions};
