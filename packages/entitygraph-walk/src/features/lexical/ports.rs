//! Search-layer port
//!
//! The builder and the mixture service only see this trait; tests substitute
//! small in-memory implementations.

use super::error::IndexError;
use crate::shared::models::{DocOrdinal, StoredParagraph};

pub trait ParagraphIndex: Send + Sync {
    /// One past the highest ordinal (deleted documents included)
    fn max_ordinal(&self) -> DocOrdinal;

    /// Stored fields of one document; `Ok(None)` when it has been deleted
    fn stored_paragraph(&self, ordinal: DocOrdinal) -> Result<Option<StoredParagraph>, IndexError>;

    /// Every distinct term of the entity field, sorted
    fn entity_terms(&self) -> Result<Vec<String>, IndexError>;

    /// Ordinals of documents mentioning `entity`, ascending, at most `limit`
    fn term_query(&self, entity: &str, limit: usize) -> Result<Vec<DocOrdinal>, IndexError>;

    /// BM25 full-text search over paragraph text, best first
    fn search(&self, query: &str, limit: usize) -> Result<Vec<(DocOrdinal, f64)>, IndexError>;

    /// Paragraph id stored at `ordinal`
    fn paragraph_id(&self, ordinal: DocOrdinal) -> Result<String, IndexError> {
        self.stored_paragraph(ordinal)?
            .map(|p| p.paragraph_id)
            .ok_or(IndexError::Deleted(ordinal))
    }
}
