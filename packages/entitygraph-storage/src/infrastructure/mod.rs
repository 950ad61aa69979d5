//! Infrastructure layer - Storage adapters
//!
//! - SQLite adapter (durable, memory-mapped reads)
//! - In-memory adapter (tests, ephemeral graphs)

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryAdjacencyStore;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteAdjacencyStore, SqliteOptions};
