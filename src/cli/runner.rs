//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::types::FailurePolicy;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run { fail_fast, preview } => self.run_pipeline(*fail_fast, *preview).await,
            Commands::Check => self.check().await,
        }
    }

    /// Merge environment config with CLI flags
    fn build_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::from_env();

        if let Some(source) = &self.cli.source {
            config = config.with_source(source);
        }
        if let Some(warehouse) = &self.cli.warehouse {
            config = config.with_warehouse(warehouse);
        }
        if let Some(schema) = &self.cli.schema {
            config = config.with_schema(schema);
        }
        if let Some(table) = &self.cli.table {
            config = config.with_table(table);
        }

        config
    }

    async fn run_pipeline(&self, fail_fast: bool, preview: usize) -> Result<()> {
        let mut config = self.build_config().with_preview_rows(preview);
        if fail_fast {
            config = config.with_failure_policy(FailurePolicy::FailFast);
        }

        let pipeline = Pipeline::new(config)?;
        let summary = pipeline.run().await?;

        info!(
            "Run finished: {} object(s) listed, {} payload(s), {} record(s), {} row(s) loaded",
            summary.objects_listed,
            summary.payloads_fetched,
            summary.records_flattened,
            summary.rows_loaded
        );
        if !summary.is_clean() {
            warn!("Run completed with skipped or failed warehouse stages (see log)");
        }

        Ok(())
    }

    async fn check(&self) -> Result<()> {
        let pipeline = Pipeline::new(self.build_config())?;
        pipeline.check().await
    }
}
