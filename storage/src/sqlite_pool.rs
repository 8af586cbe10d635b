//! SQLite connection pool wrapper for the storage crate.

use log::info;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};

/// Manages a single SQLite pool; creates DB file if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL (`sqlite://path`, `sqlite:path`, `file:path` or a
    /// bare file path).
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let path = database_path(database_url);
        info!("Initializing SQLite pool: {}", path);

        let options = SqliteConnectOptions::new()
            .create_if_missing(true)
            .filename(path);

        let pool = SqlitePool::connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Strips the URL scheme so the remainder can be handed to `SqliteConnectOptions::filename`.
pub(crate) fn database_path(database_url: &str) -> &str {
    ["sqlite://", "sqlite:", "file:"]
        .iter()
        .find_map(|scheme| database_url.strip_prefix(scheme))
        .unwrap_or(database_url)
}
