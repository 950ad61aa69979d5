//! Top-level configuration
//!
//! Preset first, then section overrides, then `validate()`.

use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::io::{apply_patch, patch_sets, ConfigExportV1, ConfigOverrides, SUPPORTED_VERSIONS};
use super::preset::Preset;
use super::settings::{BuildSettings, CachePolicy, CacheSettings, ParallelSettings, WalkSettings};
use super::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Everything the builder, walk engine and CLI read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixtureConfig {
    pub preset: Preset,
    pub build: BuildSettings,
    pub walk: WalkSettings,
    pub cache: CacheSettings,
    pub parallel: ParallelSettings,
}

impl MixtureConfig {
    /// Start from a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            build: BuildSettings::from_preset(preset),
            walk: WalkSettings::from_preset(preset),
            cache: CacheSettings::from_preset(preset),
            parallel: ParallelSettings::from_preset(preset),
        }
    }

    pub fn build(mut self, f: impl FnOnce(BuildSettings) -> BuildSettings) -> Self {
        self.build = f(self.build);
        self
    }

    pub fn walk(mut self, f: impl FnOnce(WalkSettings) -> WalkSettings) -> Self {
        self.walk = f(self.walk);
        self
    }

    pub fn cache(mut self, f: impl FnOnce(CacheSettings) -> CacheSettings) -> Self {
        self.cache = f(self.cache);
        self
    }

    pub fn parallel(mut self, f: impl FnOnce(ParallelSettings) -> ParallelSettings) -> Self {
        self.parallel = f(self.parallel);
        self
    }

    /// Load from a YAML v1 file and validate
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = Preset::from_str(&export.preset)
            .map_err(|_| ConfigError::UnknownPreset(export.preset.clone()))?;

        let mut config = Self::preset(preset);
        if let Some(overrides) = export.overrides {
            if let Some(patch) = overrides.build {
                config.build = apply_patch(&config.build, patch)?;
            }
            if let Some(patch) = overrides.walk {
                config.walk = apply_patch(&config.walk, patch)?;
            }
            if let Some(patch) = overrides.cache {
                // A non-expiring policy drops the preset's TTL unless one is given
                let keep_ttl = patch_sets(&patch, "ttl_secs") || !patch_sets(&patch, "policy");
                config.cache = apply_patch(&config.cache, patch)?;
                if !keep_ttl && config.cache.policy != CachePolicy::Adaptive {
                    config.cache.ttl_secs = None;
                }
            }
            if let Some(patch) = overrides.parallel {
                config.parallel = apply_patch(&config.parallel, patch)?;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Export as YAML v1 with every section written out as an override
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            preset: self.preset.to_string(),
            overrides: Some(ConfigOverrides {
                build: Some(serde_yaml::to_value(&self.build)?),
                walk: Some(serde_yaml::to_value(&self.walk)?),
                cache: Some(serde_yaml::to_value(&self.cache)?),
                parallel: Some(serde_yaml::to_value(&self.parallel)?),
            }),
        };

        Ok(serde_yaml::to_string(&export)?)
    }
}

impl Default for MixtureConfig {
    fn default() -> Self {
        Self::preset(Preset::Balanced)
    }
}

impl Validatable for MixtureConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.build.validate()?;
        self.walk.validate()?;
        self.cache.validate()?;
        self.parallel.validate()?;

        if self.walk.top_k > self.build.entity_result_cap {
            return Err(ConfigError::conflict(
                format!(
                    "walk.top_k ({}) exceeds build.entity_result_cap ({})",
                    self.walk.top_k, self.build.entity_result_cap
                ),
                "lower walk.top_k or raise build.entity_result_cap",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "MixtureConfig"
    }
}
