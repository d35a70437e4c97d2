//! CLI commands and argument parsing

use clap::{Parser, Subcommand};

/// lakeload CLI
#[derive(Parser, Debug)]
#[command(name = "lakeload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source bucket URL (s3://bucket/prefix or a local path)
    #[arg(short, long, global = true)]
    pub source: Option<String>,

    /// Warehouse database file
    #[arg(short, long, global = true)]
    pub warehouse: Option<String>,

    /// Target schema name
    #[arg(long, global = true)]
    pub schema: Option<String>,

    /// Target table name
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full extract/transform/load pipeline
    Run {
        /// Abort on the first stage error instead of logging and continuing
        #[arg(long)]
        fail_fast: bool,

        /// Rows shown when previewing batches (0 disables previews)
        #[arg(long, default_value = "5")]
        preview: usize,
    },

    /// Probe the source listing and the warehouse connection
    Check,
}
