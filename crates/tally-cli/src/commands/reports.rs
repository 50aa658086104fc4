//! Report command implementations (dashboard, monthly, categories, month)

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use tally_core::query::{self, BucketOrder};
use tally_core::{CategoryTotal, DashboardStats, ExpenseStore, KeyValueStore, MonthlyTotal};

use super::truncate;

const BAR_WIDTH: usize = 30;

/// Proportional bar for `value` against `max`
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

fn percent(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

pub fn cmd_dashboard<S: KeyValueStore>(
    store: &ExpenseStore<S>,
    today: NaiveDate,
    order: BucketOrder,
    json: bool,
) -> Result<DashboardStats> {
    let stats = DashboardStats::compute(store.expenses(), today, order);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(stats);
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           💰 Tally Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Total Expenses:  ${:.2}", stats.total);
    println!("  This Month:      ${:.2}", stats.this_month);
    println!("  Categories:      {}", stats.category_count);
    println!("  Avg per Month:   ${:.2}", stats.average_per_month);
    println!("  Records:         {}", stats.expense_count);

    if stats.expense_count == 0 {
        println!();
        println!("  No expenses yet. Add one with 'tally add'.");
        return Ok(stats);
    }

    println!();
    println!("  📅 Monthly");
    let max = stats.monthly.iter().map(|m| m.total).fold(0.0, f64::max);
    for month in &stats.monthly {
        println!(
            "     {:<8} │ {:>10.2} │ {}",
            month.month,
            month.total,
            bar(month.total, max)
        );
    }

    println!();
    println!("  🏷️  By Category");
    let max = stats.categories.iter().map(|c| c.total).fold(0.0, f64::max);
    for category in &stats.categories {
        println!(
            "     {:<17} │ {:>10.2} │ {}",
            truncate(&category.category, 17),
            category.total,
            bar(category.total, max)
        );
    }
    println!();

    Ok(stats)
}

pub fn cmd_report_monthly<S: KeyValueStore>(
    store: &ExpenseStore<S>,
    order: BucketOrder,
) -> Result<Vec<MonthlyTotal>> {
    let monthly = query::monthly_breakdown_with(store.expenses(), order);

    println!();
    println!("📅 Spending by Month");
    println!("   ─────────────────────────────────────────────────────────────");

    if monthly.is_empty() {
        println!("   No expenses recorded.");
        return Ok(monthly);
    }

    let max = monthly.iter().map(|m| m.total).fold(0.0, f64::max);
    for month in &monthly {
        println!(
            "   {:<8} │ {:>10.2} │ {}",
            month.month,
            month.total,
            bar(month.total, max)
        );
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:<8} │ {:>10.2}", "Total", query::total_of(store.expenses()));

    Ok(monthly)
}

pub fn cmd_report_categories<S: KeyValueStore>(
    store: &ExpenseStore<S>,
    order: BucketOrder,
) -> Result<Vec<CategoryTotal>> {
    let categories = query::category_breakdown_with(store.expenses(), order);
    let total = query::total_of(store.expenses());

    println!();
    println!("🏷️  Spending by Category");
    println!("   ─────────────────────────────────────────────────────────────");

    if categories.is_empty() {
        println!("   No expenses recorded.");
        return Ok(categories);
    }

    println!("   {:<20} │ {:>10} │ {:>6}", "Category", "Amount", "%");
    println!("   ─────────────────────┼────────────┼───────");
    for category in &categories {
        println!(
            "   {:<20} │ {:>10.2} │ {:>5.1}%",
            truncate(&category.category, 20),
            category.total,
            percent(category.total, total)
        );
    }
    println!("   ─────────────────────┼────────────┼───────");
    println!("   {:<20} │ {:>10.2} │", "Total", total);

    Ok(categories)
}

/// Total and record count for one month; `month` is 1-12
pub fn cmd_report_month<S: KeyValueStore>(
    store: &ExpenseStore<S>,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<(f64, usize)> {
    let today = Local::now().date_naive();
    let year = year.unwrap_or(today.year());
    let month = month.unwrap_or(today.month());

    let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
        anyhow::bail!("Invalid month: {} (use 1-12)", month);
    };

    let total = query::monthly_total(store.expenses(), month - 1, year);
    let count = store
        .expenses()
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .count();

    println!();
    println!("📆 {}", query::month_label(first_day));
    println!("   Total:    ${:.2}", total);
    println!("   Expenses: {}", count);

    Ok((total, count))
}
