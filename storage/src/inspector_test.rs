//! Unit tests for StoreInspector.
//!
//! Covers table listing, baseline reset with preserved reference tables, and AUTOINCREMENT reset.

use crate::inspector::StoreInspector;
use tempfile::TempDir;

async fn seeded_store(dir: &TempDir) -> StoreInspector {
    let url = format!("sqlite://{}", dir.path().join("backend.db").display());
    let store = StoreInspector::connect(&url)
        .await
        .expect("Failed to open store");

    for sql in [
        "CREATE TABLE services (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        "CREATE TABLE clients (id INTEGER PRIMARY KEY AUTOINCREMENT, tg_id INTEGER NOT NULL)",
        "CREATE TABLE bookings (id INTEGER PRIMARY KEY AUTOINCREMENT, client_id INTEGER NOT NULL REFERENCES clients(id), service_id INTEGER REFERENCES services(id), date TEXT NOT NULL)",
        "INSERT INTO services (id, name) VALUES (1, 'Haircut'), (2, 'Shave')",
        "INSERT INTO clients (tg_id) VALUES (1001), (1002)",
        "INSERT INTO bookings (client_id, service_id, date) VALUES (1, 1, '27.02.2026'), (2, 2, '01.03.2026'), (2, 1, '02.03.2026')",
    ] {
        store.execute(sql, &[]).await.expect("Failed to seed store");
    }
    store
}

#[tokio::test]
async fn test_tables_sorted_without_internal_tables() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir).await;

    let tables = store.tables().await.expect("Failed to list tables");

    assert_eq!(tables, vec!["bookings", "clients", "services"]);
}

#[tokio::test]
async fn test_reset_to_baseline_keeps_reference_tables() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir).await;

    let report = store
        .reset_to_baseline(&["services".to_string()])
        .await
        .expect("Failed to reset store");

    assert_eq!(report.preserved, vec!["services"]);
    assert_eq!(report.cleared.len(), 2);
    assert_eq!(report.rows_deleted(), 5);
    assert_eq!(store.count_rows("services").await.unwrap(), 2);
    assert_eq!(store.count_rows("clients").await.unwrap(), 0);
    assert_eq!(store.count_rows("bookings").await.unwrap(), 0);
}

#[tokio::test]
async fn test_reset_to_baseline_restarts_autoincrement() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir).await;

    store.reset_to_baseline(&[]).await.expect("Failed to reset store");
    store
        .execute("INSERT INTO clients (tg_id) VALUES (?)", &["2001"])
        .await
        .unwrap();

    let id = store
        .fetch_text("SELECT id FROM clients WHERE tg_id = ?", &["2001"])
        .await
        .unwrap();
    assert_eq!(id.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_reset_to_baseline_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir).await;

    store.reset_to_baseline(&[]).await.unwrap();
    let second = store.reset_to_baseline(&[]).await.unwrap();

    assert_eq!(second.rows_deleted(), 0);
    assert_eq!(second.cleared.len(), 3);
}
