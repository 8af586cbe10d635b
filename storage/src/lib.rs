//! Storage crate: direct access to the bot backend's SQLite store.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – TableCount, ClearedTable, BaselineReport
//! - [`inspector`] – StoreInspector (queries, row counts, baseline reset)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod inspector;
mod models;
mod sqlite_pool;

#[cfg(test)]
mod inspector_test;

pub use error::StorageError;
pub use inspector::StoreInspector;
pub use models::{BaselineReport, ClearedTable, TableCount};
pub use sqlite_pool::SqlitePoolManager;
