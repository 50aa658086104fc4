//! Dashboard summary figures

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{CategoryTotal, Expense, MonthlyTotal};
use crate::query::{self, BucketOrder};

/// Headline numbers plus the two chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total: f64,
    /// Total for the calendar month containing `today`
    pub this_month: f64,
    pub category_count: usize,
    pub month_count: usize,
    /// `total` divided by the number of months that have expenses
    pub average_per_month: f64,
    pub expense_count: usize,
    pub monthly: Vec<MonthlyTotal>,
    pub categories: Vec<CategoryTotal>,
}

impl DashboardStats {
    pub fn compute(records: &[Expense], today: NaiveDate, order: BucketOrder) -> Self {
        let total = query::total_of(records);
        let monthly = query::monthly_breakdown_with(records, order);
        let categories = query::category_breakdown_with(records, order);
        let month_count = monthly.len();

        Self {
            total,
            this_month: query::monthly_total(records, today.month0(), today.year()),
            category_count: categories.len(),
            month_count,
            average_per_month: if month_count > 0 {
                total / month_count as f64
            } else {
                0.0
            },
            expense_count: records.len(),
            monthly,
            categories,
        }
    }
}

/// Count and sum of a filtered list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilteredSummary {
    pub count: usize,
    pub total: f64,
}

impl FilteredSummary {
    pub fn of(records: &[Expense]) -> Self {
        Self {
            count: records.len(),
            total: query::total_of(records),
        }
    }
}
