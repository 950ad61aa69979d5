//! Named starting points for `MixtureConfig`
//!
//! A preset fixes every section at once; section overrides and YAML files
//! then adjust individual values.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Interactive re-ranking: 100 paragraph / 200 entity trials, LRU cache of 50k entities
    Fast,

    /// Reference walk counts (200 × 3 hops, 400 × 4 hops), moka cache with a one hour TTL
    #[default]
    Balanced,

    /// Offline precomputation: 1000 / 2000 trials, unbounded cache
    Thorough,

    /// Balanced values, meant to be overridden section by section
    Custom,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Fast,
        Preset::Balanced,
        Preset::Thorough,
        Preset::Custom,
    ];

    /// Case-insensitive lookup by name
    pub fn from_str(name: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| format!("Unknown preset '{}'. Valid presets: {}", name, Self::names()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Fast => "fast",
            Preset::Balanced => "balanced",
            Preset::Thorough => "thorough",
            Preset::Custom => "custom",
        }
    }

    /// Comma-separated preset names, for messages
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(Preset::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
