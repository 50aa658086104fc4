//! Shared test fixtures
//!
//! Available to this crate's tests and, with the `test-utils` feature, to
//! downstream crates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{NaiveDate, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::models::Expense;
use crate::storage::{KeyValueStore, MemoryStorage};

/// Build an expense with a fixed creation timestamp
pub fn expense(
    id: &str,
    date: NaiveDate,
    category: &str,
    description: &str,
    amount: f64,
    payment_method: &str,
) -> Expense {
    Expense {
        id: id.to_string(),
        date,
        category: category.to_string(),
        description: description.to_string(),
        amount,
        payment_method: payment_method.to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// Three records used across the aggregation tests:
/// - A: 2025-01-10, Food & Dining, 25.50
/// - B: 2025-01-20, Transportation, 45.00
/// - C: 2025-02-05, Food & Dining, 30.00
pub fn scenario_expenses() -> Vec<Expense> {
    vec![
        expense(
            "A",
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            "Food & Dining",
            "Lunch at restaurant",
            25.50,
            "Credit Card",
        ),
        expense(
            "B",
            NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            "Transportation",
            "Gas for car",
            45.00,
            "Debit Card",
        ),
        expense(
            "C",
            NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
            "Food & Dining",
            "Dinner with friends",
            30.00,
            "Credit Card",
        ),
    ]
}

/// Storage whose writes can be made to fail on demand
///
/// Reads and writes go to an inner [`MemoryStorage`] until `fail_writes`
/// is switched on, or `fail_writes_to` names the key being written.
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    failing_key: Mutex<Option<String>>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Refuse writes to `key` only (`None` clears it)
    pub fn fail_writes_to(&self, key: Option<&str>) {
        if let Ok(mut failing) = self.failing_key.lock() {
            *failing = key.map(str::to_string);
        }
    }

    fn refuses_write(&self, key: &str) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
            || self
                .failing_key
                .lock()
                .map(|k| k.as_deref() == Some(key))
                .unwrap_or(true)
    }
}

impl KeyValueStore for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Storage(format!("read of {} refused", key)));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.refuses_write(key) {
            return Err(Error::Storage(format!("write of {} refused", key)));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.refuses_write(key) {
            return Err(Error::Storage(format!("remove of {} refused", key)));
        }
        self.inner.remove(key)
    }
}
