//! Pipeline configuration
//!
//! One `PipelineConfig` is built at process start (environment + CLI flags)
//! and passed into every stage; nothing reads the environment after startup.
//!
//! Environment variables:
//! - `LAKELOAD_SOURCE`: bucket URL (`s3://bucket/prefix` or a local path)
//! - `LAKELOAD_WAREHOUSE`: DuckDB database file
//! - `LAKELOAD_SCHEMA` / `LAKELOAD_TABLE`: target schema and table
//! - `LAKELOAD_FAIL_FAST`: abort on the first stage error when set to `1`/`true`
//!
//! The object store client additionally reads `AWS_ACCESS_KEY_ID`,
//! `AWS_SECRET_ACCESS_KEY`, `AWS_DEFAULT_REGION` and `AWS_ENDPOINT` on its own.

use crate::error::{Error, Result};
use crate::types::FailurePolicy;
use serde::{Deserialize, Serialize};

/// Default DuckDB database file
pub const DEFAULT_WAREHOUSE: &str = "warehouse.duckdb";

/// Default target schema
pub const DEFAULT_SCHEMA: &str = "s3_sink";

/// Default target table
pub const DEFAULT_TABLE: &str = "users";

/// Default number of rows shown in batch previews
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Configuration for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Source bucket URL (`s3://bucket/prefix` or a local path)
    pub source_url: String,

    /// DuckDB database file (created if absent)
    pub warehouse_path: String,

    /// Target schema name
    pub schema_name: String,

    /// Target table name
    pub table_name: String,

    /// Continue-vs-abort policy for recoverable stage failures
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Rows shown when previewing the raw and normalized batches (0 = no preview)
    pub preview_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: String::new(),
            warehouse_path: DEFAULT_WAREHOUSE.to_string(),
            schema_name: DEFAULT_SCHEMA.to_string(),
            table_name: DEFAULT_TABLE.to_string(),
            failure_policy: FailurePolicy::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl PipelineConfig {
    /// Build a config from the environment, with defaults for everything
    /// except the source URL (which stays empty until set by a flag).
    pub fn from_env() -> Self {
        let fail_fast = std::env::var("LAKELOAD_FAIL_FAST")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            source_url: env_or("LAKELOAD_SOURCE", ""),
            warehouse_path: env_or("LAKELOAD_WAREHOUSE", DEFAULT_WAREHOUSE),
            schema_name: env_or("LAKELOAD_SCHEMA", DEFAULT_SCHEMA),
            table_name: env_or("LAKELOAD_TABLE", DEFAULT_TABLE),
            failure_policy: if fail_fast {
                FailurePolicy::FailFast
            } else {
                FailurePolicy::LogAndContinue
            },
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }

    /// Set the source bucket URL
    #[must_use]
    pub fn with_source(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    /// Set the warehouse database file
    #[must_use]
    pub fn with_warehouse(mut self, path: impl Into<String>) -> Self {
        self.warehouse_path = path.into();
        self
    }

    /// Set the target schema name
    #[must_use]
    pub fn with_schema(mut self, name: impl Into<String>) -> Self {
        self.schema_name = name.into();
        self
    }

    /// Set the target table name
    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    /// Set the failure policy
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set the preview row count
    #[must_use]
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Validate that the config can drive a run
    pub fn validate(&self) -> Result<()> {
        if self.source_url.is_empty() {
            return Err(Error::config(
                "source URL not set (use --source or LAKELOAD_SOURCE)",
            ));
        }
        if self.warehouse_path.is_empty() {
            return Err(Error::config("warehouse path must not be empty"));
        }
        if self.schema_name.is_empty() || self.table_name.is_empty() {
            return Err(Error::config("schema and table names must not be empty"));
        }
        Ok(())
    }

    /// Schema-qualified table name for SQL statements
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.warehouse_path, DEFAULT_WAREHOUSE);
        assert_eq!(config.schema_name, DEFAULT_SCHEMA);
        assert_eq!(config.table_name, DEFAULT_TABLE);
        assert_eq!(config.failure_policy, FailurePolicy::LogAndContinue);
    }

    #[test]
    fn test_builder_methods() {
        let config = PipelineConfig::default()
            .with_source("s3://records")
            .with_warehouse("/tmp/wh.duckdb")
            .with_schema("staging")
            .with_table("people")
            .with_failure_policy(FailurePolicy::FailFast)
            .with_preview_rows(0);

        assert_eq!(config.source_url, "s3://records");
        assert_eq!(config.warehouse_path, "/tmp/wh.duckdb");
        assert_eq!(config.qualified_table(), "staging.people");
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.preview_rows, 0);
    }

    #[test]
    fn test_validate_requires_source() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_err());

        let config = config.with_source("s3://records");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        let config = PipelineConfig::default()
            .with_source("s3://records")
            .with_table("");
        assert!(config.validate().is_err());
    }
}
