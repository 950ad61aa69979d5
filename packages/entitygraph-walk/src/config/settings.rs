//! Section settings
//!
//! Each section has a `from_preset` constructor, builder-style setters and a
//! `Validatable` impl. `Default` is always the balanced preset.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::{check_range, Validatable};
use serde::{Deserialize, Serialize};

// ============================================================================
// Build
// ============================================================================

/// Graph construction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    /// Paragraphs per committed batch in the paragraph pass (1..=1_000_000)
    pub checkpoint_every: usize,

    /// Entities per batch in the entity pass (1..=1_000_000)
    pub entity_batch_size: usize,

    /// Maximum paragraphs retrieved per entity term (1..=10_000_000).
    ///
    /// Entities above the cap get a truncated list, so walks through them see a
    /// smaller fan-out and decay less than their true degree implies.
    pub entity_result_cap: usize,

    /// Progress log interval in units (1..=10_000_000)
    pub progress_log_every: usize,

    /// Abort the build on the first per-unit failure
    pub fail_fast: bool,
}

impl BuildSettings {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                checkpoint_every: 5_000,
                ..Self::balanced()
            },
            Preset::Balanced | Preset::Custom => Self::balanced(),
            Preset::Thorough => Self {
                checkpoint_every: 500,
                ..Self::balanced()
            },
        }
    }

    fn balanced() -> Self {
        Self {
            checkpoint_every: 1_000,
            entity_batch_size: 10_000,
            entity_result_cap: 10_000,
            progress_log_every: 10_000,
            fail_fast: false,
        }
    }

    pub fn checkpoint_every(mut self, n: usize) -> Self {
        self.checkpoint_every = n;
        self
    }

    pub fn entity_batch_size(mut self, n: usize) -> Self {
        self.entity_batch_size = n;
        self
    }

    pub fn entity_result_cap(mut self, n: usize) -> Self {
        self.entity_result_cap = n;
        self
    }

    pub fn progress_log_every(mut self, n: usize) -> Self {
        self.progress_log_every = n;
        self
    }

    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self::balanced()
    }
}

impl Validatable for BuildSettings {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "build.checkpoint_every",
            self.checkpoint_every,
            1,
            1_000_000,
            "Each batch must hold at least one paragraph",
        )?;
        check_range(
            "build.entity_batch_size",
            self.entity_batch_size,
            1,
            1_000_000,
            "Each batch must hold at least one entity",
        )?;
        check_range(
            "build.entity_result_cap",
            self.entity_result_cap,
            1,
            10_000_000,
            "Term searches need a positive result cap",
        )?;
        check_range(
            "build.progress_log_every",
            self.progress_log_every,
            1,
            10_000_000,
            "Progress interval must be positive",
        )
    }

    fn config_name(&self) -> &'static str {
        "BuildSettings"
    }
}

// ============================================================================
// Walk
// ============================================================================

/// Trial count and hop count for one walk family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WalkParams {
    /// Independent trials per origin (1..=1_000_000)
    pub n_walks: usize,

    /// Hops per trial (1..=64)
    pub n_steps: usize,
}

impl WalkParams {
    pub const fn new(n_walks: usize, n_steps: usize) -> Self {
        Self { n_walks, n_steps }
    }

    fn validate_as(&self, prefix: &str) -> ConfigResult<()> {
        check_range(
            &format!("{prefix}.n_walks"),
            self.n_walks,
            1,
            1_000_000,
            "At least one trial is needed to estimate a distribution",
        )?;
        check_range(
            &format!("{prefix}.n_steps"),
            self.n_steps,
            1,
            64,
            "A walk needs at least one hop",
        )
    }
}

/// What the mixture service does when an origin produces no distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Leave the candidate out of the result
    #[default]
    Omit,
    /// Keep the candidate with an empty distribution
    EmptyDistribution,
    /// Fail the whole call
    Strict,
}

/// Random-walk settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkSettings {
    /// Walks starting at a paragraph
    pub paragraph: WalkParams,

    /// Walks starting at an entity
    pub entity: WalkParams,

    /// Entries kept per distribution (1..=10_000)
    pub top_k: usize,

    /// Fixed seed; `None` draws a fresh random source per call
    pub seed: Option<u64>,

    pub failure_policy: FailurePolicy,
}

impl WalkSettings {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                paragraph: WalkParams::new(100, 3),
                entity: WalkParams::new(200, 4),
                ..Self::balanced()
            },
            Preset::Balanced | Preset::Custom => Self::balanced(),
            Preset::Thorough => Self {
                paragraph: WalkParams::new(1_000, 3),
                entity: WalkParams::new(2_000, 4),
                ..Self::balanced()
            },
        }
    }

    fn balanced() -> Self {
        Self {
            paragraph: WalkParams::new(200, 3),
            entity: WalkParams::new(400, 4),
            top_k: 20,
            seed: None,
            failure_policy: FailurePolicy::Omit,
        }
    }

    pub fn paragraph(mut self, n_walks: usize, n_steps: usize) -> Self {
        self.paragraph = WalkParams::new(n_walks, n_steps);
        self
    }

    pub fn entity(mut self, n_walks: usize, n_steps: usize) -> Self {
        self.entity = WalkParams::new(n_walks, n_steps);
        self
    }

    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self::balanced()
    }
}

impl Validatable for WalkSettings {
    fn validate(&self) -> ConfigResult<()> {
        self.paragraph.validate_as("walk.paragraph")?;
        self.entity.validate_as("walk.entity")?;
        check_range(
            "walk.top_k",
            self.top_k,
            1,
            10_000,
            "Distributions must keep at least one entry",
        )
    }

    fn config_name(&self) -> &'static str {
        "WalkSettings"
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Eviction policy of the entity → paragraphs cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// Grows without bound for the lifetime of the engine
    Unbounded,
    /// Strict least-recently-used bound on entry count
    Lru,
    /// Entry-count bound plus time-to-live
    #[default]
    Adaptive,
}

/// Adjacency cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    pub policy: CachePolicy,

    /// Maximum cached entities for bounded policies (1..=100_000_000)
    pub capacity: u64,

    /// Time-to-live in seconds, adaptive policy only
    pub ttl_secs: Option<u64>,
}

impl CacheSettings {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                policy: CachePolicy::Lru,
                capacity: 50_000,
                ttl_secs: None,
            },
            Preset::Balanced | Preset::Custom => Self::balanced(),
            Preset::Thorough => Self {
                policy: CachePolicy::Unbounded,
                capacity: 1_000_000,
                ttl_secs: None,
            },
        }
    }

    fn balanced() -> Self {
        Self {
            policy: CachePolicy::Adaptive,
            capacity: 100_000,
            ttl_secs: Some(3_600),
        }
    }

    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn ttl_secs(mut self, ttl: Option<u64>) -> Self {
        self.ttl_secs = ttl;
        self
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::balanced()
    }
}

impl Validatable for CacheSettings {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "cache.capacity",
            self.capacity,
            1,
            100_000_000,
            "Bounded caches need room for at least one entity",
        )?;
        if let Some(ttl) = self.ttl_secs {
            if self.policy != CachePolicy::Adaptive {
                return Err(ConfigError::conflict(
                    "cache.ttl_secs is set but the policy does not expire entries",
                    "use 'policy: adaptive' or remove ttl_secs",
                ));
            }
            check_range(
                "cache.ttl_secs",
                ttl,
                1,
                7 * 24 * 3_600,
                "TTL must be between one second and one week",
            )?;
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "CacheSettings"
    }
}

// ============================================================================
// Parallel
// ============================================================================

/// Worker pool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelSettings {
    /// Number of workers (0=auto, 0..=256)
    pub num_workers: usize,

    /// Thread stack size in MB (1..=64)
    pub stack_size_mb: usize,
}

impl ParallelSettings {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Thorough => Self {
                num_workers: 0,
                stack_size_mb: 16,
            },
            _ => Self::default(),
        }
    }

    pub fn num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    /// Worker count with `0` resolved to the number of CPUs
    pub fn effective_workers(&self) -> usize {
        if self.num_workers == 0 {
            num_cpus::get()
        } else {
            self.num_workers
        }
    }
}

impl Default for ParallelSettings {
    fn default() -> Self {
        Self {
            num_workers: 0, // Auto
            stack_size_mb: 8,
        }
    }
}

impl Validatable for ParallelSettings {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "parallel.num_workers",
            self.num_workers,
            0,
            256,
            "Number of workers must be reasonable (0=auto)",
        )?;
        check_range(
            "parallel.stack_size_mb",
            self.stack_size_mb,
            1,
            64,
            "Stack size must be reasonable",
        )
    }

    fn config_name(&self) -> &'static str {
        "ParallelSettings"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_walks_match_reference_counts() {
        let walk = WalkSettings::from_preset(Preset::Balanced);
        assert_eq!(walk.paragraph, WalkParams::new(200, 3));
        assert_eq!(walk.entity, WalkParams::new(400, 4));
        assert_eq!(walk.top_k, 20);
        assert_eq!(walk.failure_policy, FailurePolicy::Omit);
    }

    #[test]
    fn test_build_defaults() {
        let build = BuildSettings::default();
        assert_eq!(build.checkpoint_every, 1_000);
        assert_eq!(build.entity_batch_size, 10_000);
        assert_eq!(build.entity_result_cap, 10_000);
        assert!(!build.fail_fast);
    }

    #[test]
    fn test_all_presets_validate() {
        for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough, Preset::Custom] {
            BuildSettings::from_preset(preset).validate().unwrap();
            WalkSettings::from_preset(preset).validate().unwrap();
            CacheSettings::from_preset(preset).validate().unwrap();
            ParallelSettings::from_preset(preset).validate().unwrap();
        }
    }

    #[test]
    fn test_zero_steps_rejected() {
        let err = WalkSettings::default().paragraph(10, 0).validate().unwrap_err();
        assert!(err.to_string().contains("walk.paragraph.n_steps"));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        assert!(WalkSettings::default().top_k(0).validate().is_err());
    }

    #[test]
    fn test_ttl_on_lru_is_a_conflict() {
        let cache = CacheSettings::default()
            .policy(CachePolicy::Lru)
            .ttl_secs(Some(60));
        assert!(matches!(cache.validate(), Err(ConfigError::Conflict { .. })));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(CacheSettings::default().capacity(0).validate().is_err());
    }

    #[test]
    fn test_effective_workers_resolves_auto() {
        assert_eq!(ParallelSettings::default().num_workers(3).effective_workers(), 3);
        assert!(ParallelSettings::default().effective_workers() >= 1);
    }

    #[test]
    fn test_too_many_workers_rejected() {
        assert!(ParallelSettings::default().num_workers(1_000).validate().is_err());
    }
}
