//! Query and aggregation engine
//!
//! Pure functions over a slice of expenses. Nothing here mutates its input;
//! every function returns a new sequence or value and degrades to an empty
//! result (or zero) on empty or non-matching input.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{CategoryTotal, Expense, MonthlyTotal};

/// Order of buckets returned by the breakdown functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketOrder {
    /// Months chronologically, categories alphabetically
    #[default]
    Sorted,
    /// Order in which each bucket first appears in the input
    FirstSeen,
}

impl std::str::FromStr for BucketOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sorted" | "chronological" => Ok(Self::Sorted),
            "first_seen" | "insertion" => Ok(Self::FirstSeen),
            _ => Err(format!("Unknown bucket order: {}", s)),
        }
    }
}

/// Sum of all amounts
pub fn total_of(records: &[Expense]) -> f64 {
    records.iter().map(|e| e.amount).sum()
}

/// Sum of amounts dated in `month` (zero-based, 0 = January) of `year`
pub fn monthly_total(records: &[Expense], month: u32, year: i32) -> f64 {
    records
        .iter()
        .filter(|e| e.date.month0() == month && e.date.year() == year)
        .map(|e| e.amount)
        .sum()
}

/// Records dated within `[start, end]`, both ends inclusive
pub fn by_date_range(records: &[Expense], start: NaiveDate, end: NaiveDate) -> Vec<Expense> {
    records
        .iter()
        .filter(|e| e.date >= start && e.date <= end)
        .cloned()
        .collect()
}

/// Records whose category equals `category` exactly (case-sensitive)
pub fn by_category(records: &[Expense], category: &str) -> Vec<Expense> {
    records
        .iter()
        .filter(|e| e.category == category)
        .cloned()
        .collect()
}

/// Records whose payment method equals `method` exactly
pub fn by_payment_method(records: &[Expense], method: &str) -> Vec<Expense> {
    records
        .iter()
        .filter(|e| e.payment_method == method)
        .cloned()
        .collect()
}

/// Case-insensitive substring match on description or category
///
/// An empty term matches everything. Whitespace is part of the term.
pub fn search(records: &[Expense], term: &str) -> Vec<Expense> {
    records
        .iter()
        .filter(|e| matches_term(e, term))
        .cloned()
        .collect()
}

fn matches_term(expense: &Expense, term: &str) -> bool {
    let needle = term.to_lowercase();
    needle.is_empty()
        || expense.description.to_lowercase().contains(&needle)
        || expense.category.to_lowercase().contains(&needle)
}

/// "MMM YYYY" label for a date, e.g. "Jan 2025"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Per-month totals in the default bucket order
pub fn monthly_breakdown(records: &[Expense]) -> Vec<MonthlyTotal> {
    monthly_breakdown_with(records, BucketOrder::default())
}

/// Per-month totals, one entry per (year, month) present in the data
pub fn monthly_breakdown_with(records: &[Expense], order: BucketOrder) -> Vec<MonthlyTotal> {
    let mut buckets = bucket_sums(records, |e| (e.date.year(), e.date.month()));
    if order == BucketOrder::Sorted {
        buckets.sort_by_key(|(key, _)| *key);
    }

    buckets
        .into_iter()
        .map(|((year, month), total)| MonthlyTotal {
            month: NaiveDate::from_ymd_opt(year, month, 1)
                .map(month_label)
                .unwrap_or_default(),
            total,
        })
        .collect()
}

/// Per-category totals in the default bucket order
pub fn category_breakdown(records: &[Expense]) -> Vec<CategoryTotal> {
    category_breakdown_with(records, BucketOrder::default())
}

/// Per-category totals, one entry per category present in the data
pub fn category_breakdown_with(records: &[Expense], order: BucketOrder) -> Vec<CategoryTotal> {
    let mut buckets = bucket_sums(records, |e| e.category.clone());
    if order == BucketOrder::Sorted {
        buckets.sort_by(|(a, _), (b, _)| a.cmp(b));
    }

    buckets
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect()
}

/// Group amounts by `key`, keeping buckets in first-occurrence order
fn bucket_sums<K, F>(records: &[Expense], key: F) -> Vec<(K, f64)>
where
    K: Eq + std::hash::Hash + Clone,
    F: Fn(&Expense) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<(K, f64)> = Vec::new();

    for expense in records {
        let k = key(expense);
        match index.get(&k) {
            Some(&i) => buckets[i].1 += expense.amount,
            None => {
                index.insert(k.clone(), buckets.len());
                buckets.push((k, expense.amount));
            }
        }
    }

    buckets
}

/// Categories present in the data, in first-occurrence order
pub fn distinct_categories(records: &[Expense]) -> Vec<String> {
    distinct(records.iter().map(|e| e.category.as_str()))
}

/// Payment methods present in the data, in first-occurrence order
pub fn distinct_payment_methods(records: &[Expense]) -> Vec<String> {
    distinct(records.iter().map(|e| e.payment_method.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

/// Criteria for [`filter_and_search`]
///
/// Every criterion is optional; provided criteria combine with AND.
/// The date range only applies when both bounds are set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub search_term: Option<String>,
}

impl ExpenseFilter {
    /// Create a new filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both date bounds
    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Set category equality filter
    pub fn category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = category.map(Into::into);
        self
    }

    /// Set payment method equality filter
    pub fn payment_method(mut self, method: Option<impl Into<String>>) -> Self {
        self.payment_method = method.map(Into::into);
        self
    }

    /// Set free-text search (description or category)
    pub fn search(mut self, term: Option<impl Into<String>>) -> Self {
        self.search_term = term.map(Into::into);
        self
    }

    /// True when no criterion would restrict the result
    pub fn is_empty(&self) -> bool {
        self.date_bounds().is_none()
            && non_empty(&self.category).is_none()
            && non_empty(&self.payment_method).is_none()
            && non_empty(&self.search_term).is_none()
    }

    fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start_date.zip(self.end_date)
    }

    /// Whether a single record passes every provided criterion
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some((start, end)) = self.date_bounds() {
            if expense.date < start || expense.date > end {
                return false;
            }
        }
        if let Some(category) = non_empty(&self.category) {
            if expense.category != category {
                return false;
            }
        }
        if let Some(method) = non_empty(&self.payment_method) {
            if expense.payment_method != method {
                return false;
            }
        }
        if let Some(term) = non_empty(&self.search_term) {
            if !matches_term(expense, term) {
                return false;
            }
        }
        true
    }
}

/// An empty string means "no filter", as an unselected dropdown does
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Apply every provided criterion, then sort by date, most recent first
///
/// The sort is stable: records sharing a date keep their input order.
pub fn filter_and_search(records: &[Expense], filter: &ExpenseFilter) -> Vec<Expense> {
    let mut filtered: Vec<Expense> = records
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect();
    filtered.sort_by(|a, b| b.date.cmp(&a.date));
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{expense, scenario_expenses};

    fn ids(records: &[Expense]) -> Vec<&str> {
        records.iter().map(|e| e.id.as_str()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_total_of() {
        assert_eq!(total_of(&[]), 0.0);
        assert_eq!(total_of(&scenario_expenses()), 100.5);
    }

    #[test]
    fn test_monthly_total_uses_zero_based_month() {
        let records = scenario_expenses();
        assert_eq!(monthly_total(&records, 0, 2025), 70.5);
        assert_eq!(monthly_total(&records, 1, 2025), 30.0);
        assert_eq!(monthly_total(&records, 0, 2024), 0.0);
        assert_eq!(monthly_total(&records, 12, 2025), 0.0);
    }

    #[test]
    fn test_by_date_range_is_inclusive() {
        let records = scenario_expenses();

        let hits = by_date_range(&records, date(2025, 1, 10), date(2025, 1, 20));
        assert_eq!(ids(&hits), vec!["A", "B"]);

        let single = by_date_range(&records, date(2025, 2, 5), date(2025, 2, 5));
        assert_eq!(ids(&single), vec!["C"]);

        let inverted = by_date_range(&records, date(2025, 2, 1), date(2025, 1, 1));
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_by_category_exact_and_ordered() {
        let records = scenario_expenses();
        assert_eq!(ids(&by_category(&records, "Food & Dining")), vec!["A", "C"]);
        assert!(by_category(&records, "food & dining").is_empty());
        assert!(by_category(&records, "Travel").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_over_description_and_category() {
        let records = scenario_expenses();
        assert_eq!(ids(&search(&records, "LUNCH")), vec!["A"]);
        assert_eq!(ids(&search(&records, "transport")), vec!["B"]);
        assert_eq!(search(&records, "").len(), 3);
        assert!(search(&records, "zzz").is_empty());
    }

    #[test]
    fn test_search_term_whitespace_is_significant() {
        let records = scenario_expenses();
        assert!(search(&records, "  ").len() < 3);
        assert!(search(&records, "restaurant ").is_empty());
        assert_eq!(ids(&search(&records, "at r")), vec!["A"]);

        let filter = ExpenseFilter::new().search(Some("   "));
        assert!(!filter.is_empty());
        assert!(filter_and_search(&records, &filter).is_empty());
    }

    #[test]
    fn test_scenario_breakdowns() {
        let records = scenario_expenses();

        let monthly = monthly_breakdown(&records);
        assert_eq!(
            monthly,
            vec![
                MonthlyTotal {
                    month: "Jan 2025".to_string(),
                    total: 70.5
                },
                MonthlyTotal {
                    month: "Feb 2025".to_string(),
                    total: 30.0
                },
            ]
        );

        let categories = category_breakdown(&records);
        assert_eq!(
            categories,
            vec![
                CategoryTotal {
                    category: "Food & Dining".to_string(),
                    total: 55.5
                },
                CategoryTotal {
                    category: "Transportation".to_string(),
                    total: 45.0
                },
            ]
        );

        // First-seen order gives the same answer for this data
        assert_eq!(monthly_breakdown_with(&records, BucketOrder::FirstSeen), monthly);
        assert_eq!(
            category_breakdown_with(&records, BucketOrder::FirstSeen),
            categories
        );
    }

    #[test]
    fn test_bucket_order_policies_differ_on_unsorted_input() {
        let records = vec![
            expense("1", date(2025, 3, 1), "Travel", "Train", 10.0, "Cash"),
            expense("2", date(2024, 12, 5), "Education", "Book", 20.0, "Cash"),
            expense("3", date(2025, 3, 9), "Travel", "Taxi", 5.0, "Cash"),
        ];

        let first_seen: Vec<String> = monthly_breakdown_with(&records, BucketOrder::FirstSeen)
            .into_iter()
            .map(|m| m.month)
            .collect();
        assert_eq!(first_seen, vec!["Mar 2025", "Dec 2024"]);

        let sorted: Vec<String> = monthly_breakdown(&records)
            .into_iter()
            .map(|m| m.month)
            .collect();
        assert_eq!(sorted, vec!["Dec 2024", "Mar 2025"]);

        let categories: Vec<String> = category_breakdown(&records)
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(categories, vec!["Education", "Travel"]);
    }

    #[test]
    fn test_same_month_different_years_are_separate_buckets() {
        let records = vec![
            expense("1", date(2024, 1, 3), "Other", "a", 1.0, "Cash"),
            expense("2", date(2025, 1, 3), "Other", "b", 2.0, "Cash"),
        ];
        let monthly = monthly_breakdown(&records);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month, "Jan 2024");
        assert_eq!(monthly[1].month, "Jan 2025");
    }

    #[test]
    fn test_breakdowns_partition_the_total() {
        let records = vec![
            expense("1", date(2025, 1, 3), "Shopping", "a", 0.1, "Cash"),
            expense("2", date(2025, 2, 3), "Travel", "b", 0.2, "Cash"),
            expense("3", date(2025, 1, 9), "Shopping", "c", 0.3, "Check"),
            expense("4", date(2024, 7, 1), "Other", "d", 99.99, "Cash"),
        ];
        let total = total_of(&records);

        let by_month: f64 = monthly_breakdown(&records).iter().map(|m| m.total).sum();
        let by_category: f64 = category_breakdown(&records).iter().map(|c| c.total).sum();

        assert!((by_month - total).abs() < 1e-9);
        assert!((by_category - total).abs() < 1e-9);
        assert!(monthly_breakdown(&[]).is_empty());
    }

    #[test]
    fn test_filter_without_criteria_sorts_by_date_desc() {
        let records = scenario_expenses();
        let result = filter_and_search(&records, &ExpenseFilter::new());
        assert_eq!(ids(&result), vec!["C", "B", "A"]);
        // Input untouched
        assert_eq!(ids(&records), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_filter_scenario_category() {
        let records = scenario_expenses();
        let filter = ExpenseFilter::new().category(Some("Food & Dining"));
        assert_eq!(ids(&filter_and_search(&records, &filter)), vec!["C", "A"]);
    }

    #[test]
    fn test_filter_ties_keep_input_order() {
        let same_day = date(2025, 5, 1);
        let records = vec![
            expense("1", same_day, "Other", "a", 1.0, "Cash"),
            expense("2", date(2025, 4, 1), "Other", "b", 1.0, "Cash"),
            expense("3", same_day, "Other", "c", 1.0, "Cash"),
        ];
        let result = filter_and_search(&records, &ExpenseFilter::new());
        assert_eq!(ids(&result), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_filter_all_criteria_is_conjunction() {
        let records = vec![
            expense("1", date(2025, 1, 5), "Shopping", "Groceries", 50.0, "Credit Card"),
            expense("2", date(2025, 1, 6), "Shopping", "Groceries", 20.0, "Cash"),
            expense("3", date(2025, 3, 1), "Shopping", "Groceries", 10.0, "Credit Card"),
            expense("4", date(2025, 1, 7), "Shopping", "Shoes", 80.0, "Credit Card"),
            expense("5", date(2025, 1, 8), "Travel", "Groceries abroad", 5.0, "Credit Card"),
            expense("6", date(2025, 1, 9), "Shopping", "More groceries", 7.0, "Credit Card"),
        ];
        let filter = ExpenseFilter::new()
            .date_range(Some(date(2025, 1, 1)), Some(date(2025, 1, 31)))
            .category(Some("Shopping"))
            .payment_method(Some("Credit Card"))
            .search(Some("grocer"));

        let result = filter_and_search(&records, &filter);
        assert_eq!(ids(&result), vec!["6", "1"]);

        // Same as composing the individual filters by hand
        let manual = search(
            &by_payment_method(
                &by_category(
                    &by_date_range(&records, date(2025, 1, 1), date(2025, 1, 31)),
                    "Shopping",
                ),
                "Credit Card",
            ),
            "grocer",
        );
        let mut manual_ids = ids(&manual);
        manual_ids.sort();
        let mut result_ids = ids(&result);
        result_ids.sort();
        assert_eq!(manual_ids, result_ids);
    }

    #[test]
    fn test_filter_needs_both_date_bounds() {
        let records = scenario_expenses();
        let only_start = ExpenseFilter::new().date_range(Some(date(2025, 2, 1)), None);
        assert!(only_start.is_empty());
        assert_eq!(filter_and_search(&records, &only_start).len(), 3);
    }

    #[test]
    fn test_empty_strings_do_not_filter() {
        let records = scenario_expenses();
        let filter = ExpenseFilter::new()
            .category(Some(""))
            .payment_method(Some(""))
            .search(Some(""));
        assert!(filter.is_empty());
        assert_eq!(filter_and_search(&records, &filter).len(), 3);
    }

    #[test]
    fn test_distinct_values_first_seen() {
        let records = scenario_expenses();
        assert_eq!(
            distinct_categories(&records),
            vec!["Food & Dining", "Transportation"]
        );
        assert_eq!(distinct_payment_methods(&records), vec!["Credit Card", "Debit Card"]);
    }

    #[test]
    fn test_bucket_order_parse() {
        assert_eq!("sorted".parse::<BucketOrder>().unwrap(), BucketOrder::Sorted);
        assert_eq!(
            "first-seen".parse::<BucketOrder>().unwrap(),
            BucketOrder::FirstSeen
        );
        assert!("random".parse::<BucketOrder>().is_err());
    }
}
