//! Errors raised while loading or validating a `MixtureConfig`

use thiserror::Error;

use super::preset::Preset;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting outside its accepted interval
    #[error("{field} = {value} is outside {min}..={max} ({hint})")]
    Range {
        field: String,
        value: String,
        min: String,
        max: String,
        hint: String,
    },

    #[error("configuration file has no 'version' key; start it with 'version: 1'")]
    MissingVersion,

    #[error("configuration version {found} is not supported (known: {supported:?})")]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    #[error("unknown preset '{0}', expected one of: {}", Preset::names())]
    UnknownPreset(String),

    /// Settings that are valid alone but contradict each other
    #[error("conflicting settings: {issue}; {fix}")]
    Conflict { issue: String, fix: String },

    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn range_with_hint(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
        hint: impl Into<String>,
    ) -> Self {
        ConfigError::Range {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
            hint: hint.into(),
        }
    }

    pub fn conflict(issue: impl Into<String>, fix: impl Into<String>) -> Self {
        ConfigError::Conflict {
            issue: issue.into(),
            fix: fix.into(),
        }
    }
}
