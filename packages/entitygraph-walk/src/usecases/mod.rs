//! Usecase layer
//!
//! Entry points that wire the features together for the CLI and embedders.

pub mod mixture_pipeline;

pub use mixture_pipeline::{import_paragraphs, MixturePipeline, ParagraphRecord, RankedMixture};
