//! Store inspector: direct access to the backend's database for seeding, assertions, and the
//! baseline reset performed before a run.
//!
//! External: SQLite via sqlx. Scenario code calls `fetch_text` / `execute` / `count_rows`, or
//! runs its own sqlx queries against `pool()`.

use sqlx::{sqlite::SqliteRow, Connection, Row, SqliteConnection, SqlitePool};
use tracing::{info, instrument};

use crate::error::StorageError;
use crate::models::{BaselineReport, ClearedTable, TableCount};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct StoreInspector {
    pool_manager: SqlitePoolManager,
}

impl StoreInspector {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Ok(Self { pool_manager })
    }

    pub fn from_pool(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub fn pool(&self) -> &SqlitePool {
        self.pool_manager.pool()
    }

    /// User tables, sorted by name.
    pub async fn tables(&self) -> Result<Vec<String>, StorageError> {
        let mut conn = self.pool().acquire().await?;
        Ok(list_tables(&mut *conn).await?)
    }

    pub async fn count_rows(&self, table: &str) -> Result<i64, StorageError> {
        self.ensure_table(table).await?;
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(self.pool()).await?;
        Ok(count)
    }

    pub async fn table_counts(&self) -> Result<Vec<TableCount>, StorageError> {
        let mut counts = Vec::new();
        for name in self.tables().await? {
            let rows = self.count_rows(&name).await?;
            counts.push(TableCount { name, rows });
        }
        Ok(counts)
    }

    /// First column of the first row rendered as text. `None` when no row matched or the value
    /// is NULL. Integer and real columns are formatted with `to_string`.
    pub async fn fetch_text(&self, sql: &str, binds: &[&str]) -> Result<Option<String>, StorageError> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let row = query.fetch_optional(self.pool()).await?;
        row.map(|r| first_column_text(&r))
            .transpose()
            .map(Option::flatten)
    }

    /// Runs a mutation and returns the number of affected rows.
    pub async fn execute(&self, sql: &str, binds: &[&str]) -> Result<u64, StorageError> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let result = query.execute(self.pool()).await?;
        Ok(result.rows_affected())
    }

    /// Deletes every row of every user table not listed in `preserved`, in one transaction with
    /// foreign keys disabled, and resets AUTOINCREMENT counters of the cleared tables.
    #[instrument(skip(self))]
    pub async fn reset_to_baseline(&self, preserved: &[String]) -> Result<BaselineReport, StorageError> {
        let mut conn = self.pool().acquire().await?;

        sqlx::query("PRAGMA foreign_keys = OFF")
            .execute(&mut *conn)
            .await?;
        let result = clear_tables(&mut *conn, preserved).await;
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&mut *conn)
            .await?;

        let report = result?;
        info!(
            cleared = report.cleared.len(),
            preserved = report.preserved.len(),
            rows_deleted = report.rows_deleted(),
            "Store reset to baseline"
        );
        Ok(report)
    }

    async fn ensure_table(&self, table: &str) -> Result<(), StorageError> {
        if self.tables().await?.iter().any(|t| t == table) {
            Ok(())
        } else {
            Err(StorageError::InvalidTable(table.to_string()))
        }
    }
}

async fn list_tables(conn: &mut SqliteConnection) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(conn)
    .await
}

async fn clear_tables(
    conn: &mut SqliteConnection,
    preserved: &[String],
) -> Result<BaselineReport, StorageError> {
    let tables = list_tables(conn).await?;
    let has_sequence: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence'",
    )
    .fetch_one(&mut *conn)
    .await?;

    let mut report = BaselineReport::default();
    let mut tx = conn.begin().await?;

    for name in tables {
        if preserved.iter().any(|p| p == &name) {
            report.preserved.push(name);
            continue;
        }
        let deleted = sqlx::query(&format!("DELETE FROM {}", quote_ident(&name)))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if has_sequence.0 > 0 {
            sqlx::query("DELETE FROM sqlite_sequence WHERE name = ?")
                .bind(&name)
                .execute(&mut *tx)
                .await?;
        }
        report.cleared.push(ClearedTable {
            name,
            rows_deleted: deleted,
        });
    }

    tx.commit().await?;
    Ok(report)
}

fn first_column_text(row: &SqliteRow) -> Result<Option<String>, StorageError> {
    if let Ok(text) = row.try_get::<Option<String>, _>(0) {
        return Ok(text);
    }
    if let Ok(int) = row.try_get::<Option<i64>, _>(0) {
        return Ok(int.map(|v| v.to_string()));
    }
    row.try_get::<Option<f64>, _>(0)
        .map(|real| real.map(|v| v.to_string()))
        .map_err(StorageError::from)
}

/// Double-quotes an identifier for interpolation into SQL.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
