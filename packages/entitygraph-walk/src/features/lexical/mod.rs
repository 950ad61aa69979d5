//! Paragraph index (native Tantivy)
//!
//! # Architecture Overview
//!
//! ```text
//! GraphBuilder ──┐                      ┌── stored fields by ordinal
//!                ├──► ParagraphIndex ───┼── entity term enumeration
//! MixtureService ┘    (port)            ├── capped entity term query
//!                       ↑               └── BM25 paragraph search
//!             TantivyParagraphIndex
//! ```

pub mod error;
pub mod ports;
pub mod schema;
pub mod tantivy_index;

pub use error::IndexError;
pub use ports::ParagraphIndex;
pub use schema::{SchemaFields, FIELD_ENTITIES, FIELD_PARAGRAPH_ID, FIELD_TEXT};
pub use tantivy_index::TantivyParagraphIndex;
