//! Shared module - Common types and utilities
//!
//! Types used by more than one feature, plus the worker pool and progress
//! counter the builder and mixture service run on.

pub mod models;
pub mod parallel;
pub mod progress;

// Re-exports for convenience
pub use models::*;
pub use parallel::{CancelToken, WorkerPool};
pub use progress::{ProgressSnapshot, ProgressTracker};
