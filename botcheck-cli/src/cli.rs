//! CLI parser and store settings resolution.

use botcheck::HarnessConfig;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "botcheck")]
#[command(about = "Bot harness tooling: prepare and inspect the backend store", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Clear every table except the preserved ones and restart AUTOINCREMENT counters.
    ResetStore {
        /// Overrides DATABASE_URL.
        #[arg(long)]
        database_url: Option<String>,
        /// Comma-separated tables to keep; overrides PRESERVED_TABLES.
        #[arg(long, value_delimiter = ',')]
        preserve: Option<Vec<String>>,
    },
    /// List the store's tables with row counts.
    Tables {
        #[arg(long)]
        database_url: Option<String>,
    },
}

/// Command-line value if given, else DATABASE_URL / PRESERVED_TABLES from `config`.
pub fn store_settings(
    config: &HarnessConfig,
    database_url: Option<String>,
    preserve: Option<Vec<String>>,
) -> (String, Vec<String>) {
    let url = database_url.unwrap_or_else(|| config.database_url.clone());
    let preserved = preserve
        .map(|tables| {
            tables
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_else(|| config.preserved_tables.clone());
    (url, preserved)
}
