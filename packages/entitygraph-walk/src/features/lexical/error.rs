use thiserror::Error;

use crate::shared::models::DocOrdinal;

/// Errors raised by the paragraph index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] tantivy::query::QueryParserError),

    #[error("Ordinal {ordinal} out of range (max {max})")]
    OrdinalOutOfRange { ordinal: DocOrdinal, max: DocOrdinal },

    #[error("Document {0} has been deleted")]
    Deleted(DocOrdinal),

    #[error("Document {ordinal} has no stored '{field}' value")]
    MissingField {
        ordinal: DocOrdinal,
        field: &'static str,
    },

    #[error("Schema mismatch: {0}")]
    Schema(String),

    #[error("Index was opened read-only")]
    ReadOnly,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
