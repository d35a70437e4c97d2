//! lakeload CLI
//!
//! Command-line entry point for the pipeline

use clap::Parser;
use lakeload::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    // A .env file in the working directory supplies warehouse and storage
    // credentials when present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
