/*
 * Entitygraph Walk - paragraph mixtures from a bipartite entity graph
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (EntityDistribution, ParagraphMixture), worker pool
 * - features/    : Vertical slices (lexical → graph_builder → cache → walk → rescoring)
 * - usecases/    : Wiring for the CLI and embedders
 * - config/      : Presets, section overrides, YAML v1
 *
 * Build once offline (GraphBuilder), walk many times at query time
 * (WalkEngine + MixtureService).
 */

#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

/// Usecase layer (MixturePipeline)
pub mod usecases;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{FailurePolicy, MixtureConfig, Preset, WalkParams, WalkSettings};
pub use errors::{MixtureError, Result};
pub use features::cache::{build_cache, AdjacencyCache};
pub use features::graph_builder::{BuildReport, GraphBuilder, PassReport, UnitFailure};
pub use features::lexical::{IndexError, ParagraphIndex, TantivyParagraphIndex};
pub use features::rescoring::MixtureRescorer;
pub use features::walk::{MixtureService, WalkEngine, WalkOutcome};
pub use shared::models::{DocOrdinal, EntityDistribution, ParagraphMixture, StoredParagraph};
pub use shared::parallel::{CancelToken, WorkerPool};
pub use usecases::MixturePipeline;
