//! Report types returned by the store inspector.

use serde::{Deserialize, Serialize};

/// Row count of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCount {
    pub name: String,
    pub rows: i64,
}

/// A table emptied by a baseline reset and how many rows it lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedTable {
    pub name: String,
    pub rows_deleted: u64,
}

/// Outcome of `StoreInspector::reset_to_baseline`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineReport {
    pub cleared: Vec<ClearedTable>,
    /// Preserved tables that exist in the store.
    pub preserved: Vec<String>,
}

impl BaselineReport {
    pub fn rows_deleted(&self) -> u64 {
        self.cleared.iter().map(|t| t.rows_deleted).sum()
    }
}
