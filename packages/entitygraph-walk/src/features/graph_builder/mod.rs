//! Graph Builder - bipartite adjacency from the paragraph index
//!
//! Runs once, offline. Reads every document and every entity term of the
//! `ParagraphIndex` and writes both directions of the paragraph ↔ entity graph
//! into an `AdjacencyStore`. Deterministic: the same index always produces the
//! same lists.

pub mod domain;
pub mod infrastructure;

pub use domain::{BuildReport, PassReport, UnitFailure};
pub use infrastructure::GraphBuilder;
