//! chartfeed - inspect mapping, series and the live quote cache.
//!
//! Commands:
//! - `mapping` - print the stock list
//! - `lookup` - resolve a symbol
//! - `series` - historical bars with the live overlay
//! - `refresh` / `status` - drive and inspect the live cache
//! - `upload` - put a local CSV into the bucket

mod config;
mod main_lib;

use anyhow::Context;
use chartfeed_core::ChartDataServiceTrait;
use clap::Parser;
use serde::Serialize;

use config::{Cli, Command};
use main_lib::{build_service, init_tracing};

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let (service, store) = build_service(&cli).await?;

    match &cli.command {
        Command::Mapping { reload } => {
            if *reload {
                service.reload_mapping().await;
            }
            print_json(&service.stock_list().await)?;
        }
        Command::Lookup { symbol } => {
            let record = service.instrument_for_symbol(symbol).await?;
            print_json(&record)?;
        }
        Command::Series { target } => {
            let bars = match target.trim().parse::<u64>() {
                Ok(instrument_id) => service.build_series(instrument_id).await?,
                Err(_) => service.build_series_for_symbol(target).await?,
            };
            print_json(&bars)?;
        }
        Command::Refresh { force } => {
            let outcome = service.refresh(*force).await;
            print_json(&outcome.report)?;
        }
        Command::Status => {
            print_json(&service.cache_status().await)?;
        }
        Command::Upload { file, key } => {
            let bytes = tokio::fs::read(file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let bucket = service.config().bucket.clone();
            store.put(&bucket, key, bytes).await?;
            tracing::info!("Uploaded {} to {}/{}", file.display(), bucket, key);
        }
    }
    Ok(())
}
