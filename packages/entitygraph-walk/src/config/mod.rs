//! Configuration System
//!
//! Three levels, each building on the previous one:
//! - Level 1: Preset - `MixtureConfig::preset(Preset::Fast)`
//! - Level 2: Section override - `.walk(|w| w.paragraph(500, 3))`
//! - Level 3: YAML v1 file - `MixtureConfig::from_yaml("mixtures.yaml")`
//!
//! # Examples
//!
//! ```rust
//! use entitygraph_walk::config::{MixtureConfig, Preset, Validatable};
//!
//! let config = MixtureConfig::preset(Preset::Balanced)
//!     .walk(|w| w.paragraph(500, 3).seed(42));
//! config.validate().unwrap();
//! assert_eq!(config.walk.paragraph.n_walks, 500);
//! ```

pub mod error;
pub mod io;
pub mod mixture_config;
pub mod preset;
pub mod settings;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigExportV1, ConfigOverrides};
pub use mixture_config::MixtureConfig;
pub use preset::Preset;
pub use settings::{
    BuildSettings, CachePolicy, CacheSettings, FailurePolicy, ParallelSettings, WalkParams,
    WalkSettings,
};
pub use validation::Validatable;
