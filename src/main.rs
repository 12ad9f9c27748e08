//! Database snapshot tool
//!
//! Dumps a Postgres or MySQL database to local disk, optionally uploads the
//! dump to S3 and prunes old snapshots. Meant to be run from cron.

// bacman/src/main.rs
mod backup;
mod cli;
mod config;
mod errors;
mod prune;
mod storage;
#[cfg(test)]
mod testing;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use cli::Cli;
use config::{AppConfig, resolve_engine};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    // Values in .env never override the real environment.
    dotenv::dotenv().ok();
    utils::init_logging();

    match run_app(cli).await {
        Ok(path) => {
            info!("✅ Snapshot run completed: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app(cli: Cli) -> Result<PathBuf> {
    let engine = resolve_engine(cli.engine, |key| env::var(key).ok())
        .context("Failed to select the database engine")?;

    let app_config = AppConfig::from_env(engine).context("Failed to load configuration")?;
    info!(
        "🚀 Starting {} snapshot of {} into {}",
        engine,
        app_config.database.name,
        app_config.paths.directory.display()
    );

    backup::run_backup_flow(&app_config, &cli.backup_options())
        .await
        .context("Snapshot run failed")
}
