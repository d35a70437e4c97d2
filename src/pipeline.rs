//! Pipeline orchestration
//!
//! Runs the stages in order (enumerate, flatten, materialize, normalize,
//! then provision and load) and applies the configured `FailurePolicy` to
//! the warehouse-side stages. Everything upstream of the sink halts the run
//! on error; there is nothing to load without it.

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::flatten::flatten_payloads;
use crate::normalize::normalize_batch;
use crate::source::{filter_json_keys, BucketSource};
use crate::table::{batch_preview, records_to_batch};
use crate::types::{FailurePolicy, JsonValue, RunSummary};
use crate::warehouse::Warehouse;
use tracing::{error, info, warn};

/// Pipeline runner: one config, one run
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline from a validated config
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Access the config this pipeline runs with
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline once
    pub async fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        info!(
            "Starting run: {} -> {} ({})",
            self.config.source_url,
            self.config.qualified_table(),
            self.config.warehouse_path
        );

        // Extract
        let source = BucketSource::parse(&self.config.source_url)?;
        let payloads = self.extract(&source, &mut summary).await?;

        // Flatten
        let records = flatten_payloads(&payloads)?;
        summary.records_flattened = records.len();
        info!("Flattened {} record(s)", records.len());

        if records.is_empty() {
            warn!("No records extracted; provisioning only, nothing to load");
            self.provision_stage(&mut summary)?;
            return Ok(summary);
        }

        // Materialize
        let raw_batch = records_to_batch(&records)?;
        if self.config.preview_rows > 0 {
            info!(
                "Raw batch ({} rows):\n{}",
                raw_batch.num_rows(),
                batch_preview(&raw_batch, self.config.preview_rows)?
            );
        }

        // Normalize
        let normalized = normalize_batch(&raw_batch)?;
        summary.rows_normalized = normalized.num_rows();
        info!("Normalized {} row(s)", normalized.num_rows());
        if self.config.preview_rows > 0 {
            info!(
                "Normalized batch:\n{}",
                batch_preview(&normalized, self.config.preview_rows)?
            );
        }

        // Provision, then load
        let Some(warehouse) = self.open_warehouse()? else {
            return Ok(summary);
        };

        match warehouse.provision(&self.config.schema_name, &self.config.table_name) {
            Ok(()) => {
                summary.provisioned = true;
                info!(
                    "Provisioned {} in {}",
                    self.config.qualified_table(),
                    warehouse.path()
                );
            }
            Err(e) => self.stage_failure("Provisioning", e)?,
        }

        match warehouse.overwrite_table(
            &self.config.schema_name,
            &self.config.table_name,
            &normalized,
        ) {
            Ok(rows) => {
                summary.rows_loaded = rows;
                summary.loaded = true;
                info!("Loaded {rows} row(s) into {}", self.config.qualified_table());
            }
            Err(e) => self.stage_failure("Load", e)?,
        }

        Ok(summary)
    }

    /// Probe the source listing and the warehouse connection
    pub async fn check(&self) -> Result<()> {
        let source = BucketSource::parse(&self.config.source_url)?;
        let objects = source.list_objects().await?;
        let json_count = filter_json_keys(&objects).len();
        info!(
            "Source OK ({}): {} object(s), {} with a .json suffix",
            source.scheme(),
            objects.len(),
            json_count
        );

        let warehouse = Warehouse::open(&self.config.warehouse_path)?;
        warehouse.check()?;
        info!("Warehouse OK: {}", warehouse.path());

        Ok(())
    }

    /// List the bucket, log the listing, fetch and parse every `.json` object
    async fn extract(
        &self,
        source: &BucketSource,
        summary: &mut RunSummary,
    ) -> Result<Vec<JsonValue>> {
        let objects = source.list_objects().await?;
        summary.objects_listed = objects.len();

        if objects.is_empty() {
            warn!("No objects found in source {}", self.config.source_url);
        } else {
            info!("Objects in source:");
            for (idx, meta) in objects.iter().enumerate() {
                info!("  {}. {}", idx + 1, meta.location);
            }
            info!("{} object(s) present in the source", objects.len());
        }

        let keys = filter_json_keys(&objects);
        let mut payloads = Vec::with_capacity(keys.len());
        for key in &keys {
            payloads.push(source.fetch_payload(key).await?);
        }
        summary.payloads_fetched = payloads.len();
        info!("Fetched {} JSON payload(s)", payloads.len());

        Ok(payloads)
    }

    /// Open the warehouse; under the default policy a failure here is logged
    /// and the remaining warehouse stages are skipped.
    fn open_warehouse(&self) -> Result<Option<Warehouse>> {
        match Warehouse::open(&self.config.warehouse_path) {
            Ok(warehouse) => Ok(Some(warehouse)),
            Err(e) => {
                self.stage_failure("Warehouse connection", e)?;
                Ok(None)
            }
        }
    }

    /// Provision without loading (used when there is nothing to load)
    fn provision_stage(&self, summary: &mut RunSummary) -> Result<()> {
        let Some(warehouse) = self.open_warehouse()? else {
            return Ok(());
        };
        match warehouse.provision(&self.config.schema_name, &self.config.table_name) {
            Ok(()) => {
                summary.provisioned = true;
                Ok(())
            }
            Err(e) => self.stage_failure("Provisioning", e),
        }
    }

    /// Apply the failure policy to a recoverable stage error
    fn stage_failure(&self, stage: &str, err: Error) -> Result<()> {
        match self.config.failure_policy {
            FailurePolicy::FailFast => Err(err),
            FailurePolicy::LogAndContinue => {
                error!("{stage} failed: {err}");
                Ok(())
            }
        }
    }
}
