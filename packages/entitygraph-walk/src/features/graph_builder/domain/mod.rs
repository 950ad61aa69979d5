//! Build reports

use serde::{Deserialize, Serialize};

/// One unit (paragraph ordinal or entity term) that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFailure {
    pub unit: String,
    pub error: String,
}

/// Outcome of one build pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    pub total_units: usize,
    pub succeeded: usize,
    /// Deleted documents, not written
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<UnitFailure>,
    /// Committed batches
    pub checkpoints: usize,
    pub cancelled: bool,
}

impl PassReport {
    pub fn new(total_units: usize) -> Self {
        Self {
            total_units,
            ..Self::default()
        }
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed == 0 && !self.cancelled
    }

    pub(crate) fn record_failure(&mut self, unit: String, error: String) {
        self.failed += 1;
        self.failures.push(UnitFailure { unit, error });
    }
}

/// Outcome of `GraphBuilder::run`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub paragraphs: PassReport,
    pub entities: PassReport,
    #[serde(rename = "duration")]
    pub elapsed_seconds: f64,
    pub cancelled: bool,
}

impl BuildReport {
    pub fn failed_units(&self) -> usize {
        self.paragraphs.failed + self.entities.failed
    }

    pub fn is_complete_success(&self) -> bool {
        self.paragraphs.is_complete_success() && self.entities.is_complete_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_are_counted() {
        let mut report = PassReport::new(3);
        report.succeeded = 2;
        report.record_failure("7".to_string(), "boom".to_string());

        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].unit, "7");
        assert!(!report.is_complete_success());
    }

    #[test]
    fn test_cancelled_pass_is_not_complete() {
        let report = PassReport {
            cancelled: true,
            ..PassReport::new(0)
        };
        assert!(!report.is_complete_success());
    }
}
