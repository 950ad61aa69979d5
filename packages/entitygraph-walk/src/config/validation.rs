//! Configuration validation
//!
//! Every settings struct implements `Validatable`; `MixtureConfig::validate`
//! fans out to each section and then checks cross-section consistency.

use super::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration objects
pub trait Validatable {
    /// Validate the configuration
    ///
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

/// Inclusive range check shared by the settings validators
pub(crate) fn check_range<T>(field: &str, value: T, min: T, max: T, hint: &str) -> ConfigResult<()>
where
    T: PartialOrd + ToString + Copy,
{
    if value < min || value > max {
        return Err(ConfigError::range_with_hint(field, value, min, max, hint));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_bounds_are_inclusive() {
        assert!(check_range("x", 1usize, 1, 10, "").is_ok());
        assert!(check_range("x", 10usize, 1, 10, "").is_ok());
        assert!(check_range("x", 0usize, 1, 10, "").is_err());
        assert!(check_range("x", 11usize, 1, 10, "").is_err());
    }

    #[test]
    fn test_check_range_reports_field() {
        let err = check_range("cache.capacity", 0u64, 1, 100, "non-empty").unwrap_err();
        assert!(err.to_string().contains("cache.capacity"));
    }
}
