//! botcheck CLI: reset the backend store to its baseline, or list its tables. Settings from env
//! (.env is loaded) and optional flags.

use anyhow::{Context, Result};
use botcheck::{init_tracing, HarnessConfig, StoreInspector};
use botcheck_cli::{store_settings, Cli, Commands};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(None)?;

    let cli = Cli::parse();
    let config = HarnessConfig::store_from_env();

    match cli.command {
        Commands::ResetStore {
            database_url,
            preserve,
        } => {
            let (url, preserved) = store_settings(&config, database_url, preserve);
            handle_reset_store(&url, &preserved).await
        }
        Commands::Tables { database_url } => {
            let (url, _) = store_settings(&config, database_url, None);
            handle_tables(&url).await
        }
    }
}

async fn handle_reset_store(database_url: &str, preserved: &[String]) -> Result<()> {
    let store = StoreInspector::connect(database_url)
        .await
        .with_context(|| format!("Open store {}", database_url))?;
    let report = store
        .reset_to_baseline(preserved)
        .await
        .context("Reset store to baseline")?;

    info!(database_url, "Store reset finished");
    for table in &report.cleared {
        println!("cleared   {:<32} {} row(s)", table.name, table.rows_deleted);
    }
    for name in &report.preserved {
        println!("preserved {}", name);
    }
    println!("Total rows deleted: {}", report.rows_deleted());
    Ok(())
}

async fn handle_tables(database_url: &str) -> Result<()> {
    let store = StoreInspector::connect(database_url)
        .await
        .with_context(|| format!("Open store {}", database_url))?;
    let counts = store.table_counts().await.context("Count table rows")?;

    if counts.is_empty() {
        println!("No tables (store: {}).", database_url);
        return Ok(());
    }

    println!("{:<32} {}", "table", "rows");
    println!("{}", "-".repeat(44));
    for table in &counts {
        println!("{:<32} {}", table.name, table.rows);
    }
    Ok(())
}
