use serde::{Deserialize, Serialize};

use super::distribution::EntityDistribution;

/// Global document ordinal in the paragraph index (segment base + local doc id)
pub type DocOrdinal = u32;

/// Stored fields of one indexed paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredParagraph {
    pub paragraph_id: String,
    /// Entity mentions in index order, duplicates kept
    pub entities: Vec<String>,
}

/// Entity distribution of one retrieved paragraph, plus its retrieval score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphMixture {
    pub doc_id: DocOrdinal,
    pub paragraph_id: String,
    pub retrieval_score: f64,
    pub distribution: EntityDistribution,
}

impl ParagraphMixture {
    pub fn new(
        doc_id: DocOrdinal,
        paragraph_id: impl Into<String>,
        retrieval_score: f64,
        distribution: EntityDistribution,
    ) -> Self {
        Self {
            doc_id,
            paragraph_id: paragraph_id.into(),
            retrieval_score,
            distribution,
        }
    }
}
