//! Error types for entitygraph-walk
//!
//! Provides unified error handling across the crate.

use entitygraph_storage::{Relation, StorageError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::features::lexical::IndexError;

/// Main error type for graph building, walking and mixture scoring
#[derive(Debug, Error)]
pub enum MixtureError {
    /// A node the walk had to leave from has no stored adjacency list
    #[error("No adjacency for '{node}' in {relation}")]
    MissingAdjacency { node: String, relation: Relation },

    /// The walk finished but accumulated no usable mass
    #[error("Walk from '{origin}' produced an empty distribution")]
    EmptyDistribution { origin: String },

    /// The paragraph index failed while resolving an identifier
    #[error("Index access failed for '{id}': {source}")]
    IndexAccess {
        id: String,
        #[source]
        source: IndexError,
    },

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker pool could not be created
    #[error("Worker pool error: {0}")]
    Pool(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed paragraph record
    #[error("Invalid record at line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Metrics registration failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl MixtureError {
    pub fn missing(node: impl Into<String>, relation: Relation) -> Self {
        MixtureError::MissingAdjacency {
            node: node.into(),
            relation,
        }
    }

    pub fn index(id: impl Into<String>, source: IndexError) -> Self {
        MixtureError::IndexAccess {
            id: id.into(),
            source,
        }
    }

    /// Failures that mean "no distribution for this origin" rather than a broken backend
    pub fn is_per_origin(&self) -> bool {
        matches!(
            self,
            MixtureError::MissingAdjacency { .. } | MixtureError::EmptyDistribution { .. }
        )
    }
}

/// Result type alias for entitygraph-walk operations
pub type Result<T> = std::result::Result<T, MixtureError>;
