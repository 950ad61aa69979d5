//! Random-walk mixtures
//!
//! `WalkEngine` turns graph structure into entity distributions;
//! `MixtureService` maps ranked search candidates to `ParagraphMixture`s on a
//! worker pool, applying the configured `FailurePolicy`.

pub mod domain;
pub mod engine;
pub mod mixture_service;

pub use domain::{fan_out_penalty, WalkOutcome};
pub use engine::WalkEngine;
pub use mixture_service::MixtureService;
