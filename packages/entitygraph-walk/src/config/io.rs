//! Configuration I/O
//!
//! YAML schema types and the section patching used when loading.
//! Loading and export live on `MixtureConfig`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::error::ConfigResult;

/// Versions this build can read
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    pub preset: String,

    /// Section patches, applied field by field on top of the preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Per-section patches. Keys left out keep the preset's value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walk: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<Value>,
}

/// Apply `patch` over `base` and read the result back.
///
/// Mappings merge key by key (recursively); any other value replaces. Unknown
/// keys survive the merge and are rejected by the section's own schema.
pub fn apply_patch<T>(base: &T, patch: Value) -> ConfigResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = serde_yaml::to_value(base)?;
    merge(&mut merged, patch);
    Ok(serde_yaml::from_value(merged)?)
}

/// Whether a section patch names `key` explicitly
pub fn patch_sets(patch: &Value, key: &str) -> bool {
    patch
        .as_mapping()
        .map_or(false, |mapping| mapping.contains_key(key))
}

fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Mapping(base), Value::Mapping(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
