//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Expense records and their validation
//! - Local key-value storage (SQLite, JSON files, in-memory)
//! - Expense store with whole-snapshot persistence
//! - Query and aggregation engine (totals, monthly/category buckets, filters)
//! - Dashboard summaries
//! - Mocked local sign-in
//! - CSV/JSON export
//! - Configuration file loading

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod models;
pub mod query;
pub mod storage;
pub mod store;

/// Test fixtures (sample expenses, storage with injectable failures)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use auth::{CredentialVerifier, MockVerifier, Session};
pub use config::Config;
pub use dashboard::{DashboardStats, FilteredSummary};
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use models::{
    Category, CategoryTotal, Expense, ExpenseUpdate, MonthlyTotal, NewExpense, PaymentMethod,
    User,
};
pub use query::{BucketOrder, ExpenseFilter};
pub use storage::{Backend, JsonFileStorage, KeyValueStore, MemoryStorage, SqliteStorage};
pub use store::{ExpenseStore, NotFoundPolicy};
