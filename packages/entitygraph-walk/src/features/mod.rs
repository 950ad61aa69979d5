//! Feature modules
//!
//! - `lexical`: paragraph index port and Tantivy adapter
//! - `graph_builder`: offline two-pass construction of the adjacency store
//! - `cache`: entity → paragraphs cache policies
//! - `walk`: restart random walks and batch mixtures
//! - `rescoring`: candidate scores from mixtures

pub mod cache;
pub mod graph_builder;
pub mod lexical;
pub mod rescoring;
pub mod walk;
