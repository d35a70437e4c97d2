//! Common types used throughout lakeload
//!
//! Shared type aliases and small shared types used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Failure Policy
// ============================================================================

/// How the orchestrator reacts to a recoverable stage failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the error and keep going (source-system behavior)
    #[default]
    LogAndContinue,
    /// Abort the run on the first error of any stage
    FailFast,
}

// ============================================================================
// Run Summary
// ============================================================================

/// Counters reported at the end of a pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Objects listed in the source bucket (all suffixes)
    pub objects_listed: usize,
    /// `.json` payloads fetched and parsed
    pub payloads_fetched: usize,
    /// Records after flattening
    pub records_flattened: usize,
    /// Rows in the normalized batch
    pub rows_normalized: usize,
    /// Whether the schema/table DDL succeeded
    pub provisioned: bool,
    /// Rows written to the warehouse table
    pub rows_loaded: usize,
    /// Whether the bulk load succeeded
    pub loaded: bool,
}

impl RunSummary {
    /// True when every stage, including the warehouse-side ones, succeeded
    pub fn is_clean(&self) -> bool {
        self.provisioned && self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_policy_serde() {
        let policy: FailurePolicy = serde_json::from_str("\"fail_fast\"").unwrap();
        assert_eq!(policy, FailurePolicy::FailFast);

        let json = serde_json::to_string(&FailurePolicy::LogAndContinue).unwrap();
        assert_eq!(json, "\"log_and_continue\"");
    }

    #[test]
    fn test_failure_policy_default() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::LogAndContinue);
    }

    #[test]
    fn test_summary_is_clean() {
        let mut summary = RunSummary::default();
        assert!(!summary.is_clean());

        summary.provisioned = true;
        summary.loaded = true;
        assert!(summary.is_clean());
    }
}
