//! Integration tests for tally-core
//!
//! These tests exercise the full add → persist → reload → report workflow
//! on the real storage backends.

use chrono::{NaiveDate, TimeZone, Utc};
use tally_core::{
    config::Config,
    dashboard::{DashboardStats, FilteredSummary},
    export,
    models::{Expense, ExpenseUpdate, NewExpense},
    query::{self, BucketOrder, ExpenseFilter},
    storage::{Backend, JsonFileStorage, KeyValueStore, SqliteStorage, EXPENSES_KEY},
    store::ExpenseStore,
    Error,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Replace the demonstration data with the A/B/C scenario and return the ids
fn load_scenario<S: KeyValueStore>(store: &mut ExpenseStore<S>) -> Vec<String> {
    let demo_ids: Vec<String> = store.expenses().iter().map(|e| e.id.clone()).collect();
    for id in &demo_ids {
        assert!(store.delete(id).unwrap());
    }

    let records = [
        NewExpense::new(date(2025, 1, 10), "Food & Dining", "Lunch at restaurant", 25.50, "Credit Card"),
        NewExpense::new(date(2025, 1, 20), "Transportation", "Gas for car", 45.00, "Debit Card"),
        NewExpense::new(date(2025, 2, 5), "Food & Dining", "Dinner with friends", 30.00, "Credit Card"),
    ];
    records
        .into_iter()
        .map(|new| store.add(new).unwrap().id)
        .collect()
}

// =============================================================================
// Store Workflow Tests
// =============================================================================

#[test]
fn test_sqlite_workflow_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tally.db");

    let ids = {
        let storage = SqliteStorage::open(&db_path).expect("Failed to open database");
        let mut store = ExpenseStore::load(storage);
        assert_eq!(store.len(), 4, "fresh store starts with demonstration data");
        load_scenario(&mut store)
    };

    let storage = SqliteStorage::open(&db_path).unwrap();
    let mut store = ExpenseStore::load(storage);
    assert_eq!(store.len(), 3);
    assert_eq!(query::total_of(store.expenses()), 100.5);

    // Update B, delete C, and check the reloaded view
    let update = ExpenseUpdate {
        amount: Some(50.0),
        description: Some("Gas and car wash".to_string()),
        ..Default::default()
    };
    let updated = store.update(&ids[1], &update).unwrap().unwrap();
    assert_eq!(updated.amount, 50.0);
    assert!(store.delete(&ids[2]).unwrap());

    let store = ExpenseStore::load(SqliteStorage::open(&db_path).unwrap());
    let descriptions: Vec<&str> = store.expenses().iter().map(|e| e.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Lunch at restaurant", "Gas and car wash"]);
}

#[test]
fn test_json_backend_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::open(dir.path()).unwrap();
    let mut store = ExpenseStore::load(&storage);
    load_scenario(&mut store);

    let raw = std::fs::read_to_string(dir.path().join("expenses.json")).unwrap();
    let persisted: Vec<Expense> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted, store.expenses());
}

#[test]
fn test_rejected_add_leaves_storage_untouched() {
    let storage = SqliteStorage::in_memory().unwrap();
    let mut store = ExpenseStore::load(&storage);
    let before = storage.get(EXPENSES_KEY).unwrap();

    let err = store
        .add(NewExpense::new(date(2025, 1, 1), "Other", "", 10.0, "Cash"))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = store
        .add(NewExpense::new(date(2025, 1, 1), "Other", "Refund", -10.0, "Cash"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Please enter a valid positive amount");

    assert_eq!(storage.get(EXPENSES_KEY).unwrap(), before);
}

#[test]
fn test_corrupt_snapshot_is_not_overwritten_on_load() {
    let storage = SqliteStorage::in_memory().unwrap();
    storage.set(EXPENSES_KEY, "[{\"broken\":").unwrap();

    let store = ExpenseStore::load(&storage);
    assert_eq!(store.len(), 4);
    assert_eq!(
        storage.get(EXPENSES_KEY).unwrap().as_deref(),
        Some("[{\"broken\":")
    );
}

// =============================================================================
// Reporting Tests
// =============================================================================

#[test]
fn test_scenario_reports() {
    let storage = SqliteStorage::in_memory().unwrap();
    let mut store = ExpenseStore::load(&storage);
    load_scenario(&mut store);
    let records = store.expenses();

    assert_eq!(query::monthly_total(records, 0, 2025), 70.5);
    assert_eq!(query::monthly_total(records, 1, 2025), 30.0);

    let monthly = query::monthly_breakdown(records);
    assert_eq!(monthly.len(), 2);
    assert_eq!((monthly[0].month.as_str(), monthly[0].total), ("Jan 2025", 70.5));
    assert_eq!((monthly[1].month.as_str(), monthly[1].total), ("Feb 2025", 30.0));

    let categories = query::category_breakdown(records);
    assert_eq!(categories[0].category, "Food & Dining");
    assert_eq!(categories[0].total, 55.5);
    assert_eq!(categories[1].total, 45.0);

    let filter = ExpenseFilter::new().search(Some("DINNER"));
    let found = query::filter_and_search(records, &filter);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].description, "Dinner with friends");

    let filter = ExpenseFilter::new()
        .category(Some("Food & Dining"))
        .date_range(Some(date(2025, 1, 1)), Some(date(2025, 1, 31)));
    let found = query::filter_and_search(records, &filter);
    assert_eq!(FilteredSummary::of(&found).total, 25.5);

    let stats = DashboardStats::compute(records, date(2025, 2, 28), BucketOrder::Sorted);
    assert_eq!(stats.total, 100.5);
    assert_eq!(stats.this_month, 30.0);
    assert_eq!(stats.average_per_month, 50.25);
}

#[test]
fn test_export_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::new(dir.path());
    config.backend = Backend::Json;

    {
        let mut store = ExpenseStore::load(config.open_storage().unwrap());
        load_scenario(&mut store);
    }

    let store = ExpenseStore::load(config.open_storage().unwrap());
    let csv = export::export_csv_string(store.expenses()).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.contains(",Gas for car,45.00,Debit Card,"));
}

#[test]
fn test_demo_data_dated_relative_to_now() {
    let now = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();
    let store = ExpenseStore::load_at(SqliteStorage::in_memory().unwrap(), now);

    let dates: Vec<NaiveDate> = store.expenses().iter().map(|e| e.date).collect();
    assert_eq!(
        dates,
        vec![date(2025, 6, 28), date(2025, 6, 25), date(2025, 6, 23), date(2025, 6, 20)]
    );
    assert_eq!(query::monthly_total(store.expenses(), 5, 2025), 221.25);
}
