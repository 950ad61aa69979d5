//! Common test utilities for entitygraph-walk
//!
//! Shared fixtures (toy graphs, indexes) and assertions for the integration
//! tests.
#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;
