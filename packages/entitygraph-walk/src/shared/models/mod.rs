//! Shared models

mod distribution;
mod mixture;

pub use distribution::EntityDistribution;
pub use mixture::{DocOrdinal, ParagraphMixture, StoredParagraph};
