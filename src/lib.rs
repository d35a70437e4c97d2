//! # lakeload
//!
//! A batch pipeline that moves JSON records from object storage into a
//! warehouse table, flattening and normalizing the nested person fields
//! along the way.
//!
//! ## Stages
//!
//! ```text
//! ┌────────────┐   ┌──────────┐   ┌─────────────┐   ┌────────────┐
//! │  Source    │ → │ Flatten  │ → │ Materialize │ → │ Normalize  │
//! │  (bucket)  │   │ results  │   │ (Arrow)     │   │ (4 fields) │
//! └────────────┘   └──────────┘   └─────────────┘   └─────┬──────┘
//!                                                         │
//!                  ┌───────────┐   ┌───────────────┐      │
//!                  │ Provision │ → │  Bulk load    │ ←────┘
//!                  │ (DDL)     │   │  (overwrite)  │
//!                  └───────────┘   └───────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lakeload::{config::PipelineConfig, pipeline::Pipeline, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = PipelineConfig::from_env().with_source("s3://my-bucket/users/");
//!     let summary = Pipeline::new(config)?.run().await?;
//!     println!("loaded {} rows", summary.rows_loaded);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pipeline configuration
pub mod config;

/// Object-storage source
pub mod source;

/// Record flattening
pub mod flatten;

/// Tabular materialization (Arrow)
pub mod table;

/// Field normalization (the transform stage)
pub mod normalize;

/// Warehouse access (DuckDB)
pub mod warehouse;

/// Pipeline orchestration
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::PipelineConfig;
pub use pipeline::Pipeline;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
