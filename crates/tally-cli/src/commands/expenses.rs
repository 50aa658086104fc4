//! Expense command implementations (add, edit, delete, list, categories)

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tally_core::models::{Category, ExpenseUpdate, NewExpense, PaymentMethod};
use tally_core::query::{self, ExpenseFilter};
use tally_core::{Expense, ExpenseStore, FilteredSummary, KeyValueStore};

use super::truncate;

/// Parse an optional YYYY-MM-DD flag value
pub fn parse_date(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("Invalid --{} date format (use YYYY-MM-DD)", flag))
}

/// Canonical label when the input names a known category, otherwise as typed
pub fn category_label(input: &str) -> String {
    input
        .parse::<Category>()
        .map(|c| c.to_string())
        .unwrap_or_else(|_| input.trim().to_string())
}

pub fn payment_label(input: &str) -> String {
    input
        .parse::<PaymentMethod>()
        .map(|m| m.to_string())
        .unwrap_or_else(|_| input.trim().to_string())
}

/// Filter from the `list`/`export` flags
///
/// Category and payment method go through the same canonicalization as
/// `add` and `edit`, so `-c food-dining` finds "Food & Dining" records.
pub fn build_filter(
    from: Option<&str>,
    to: Option<&str>,
    category: Option<&str>,
    payment: Option<&str>,
    search: Option<&str>,
) -> Result<ExpenseFilter> {
    Ok(ExpenseFilter::new()
        .date_range(parse_date(from, "from")?, parse_date(to, "to")?)
        .category(category.map(category_label))
        .payment_method(payment.map(payment_label))
        .search(search))
}

pub fn cmd_add<S: KeyValueStore>(
    store: &mut ExpenseStore<S>,
    amount: f64,
    category: &str,
    description: &str,
    payment: &str,
    date: Option<&str>,
) -> Result<()> {
    let date = parse_date(date, "date")?.unwrap_or_else(|| Local::now().date_naive());
    let new = NewExpense::new(
        date,
        category_label(category),
        description.trim(),
        amount,
        payment_label(payment),
    );

    let expense = store.add(new).context("Failed to add expense")?;

    println!("✅ Added expense {}", expense.id);
    println!(
        "   {} │ ${:>9.2} │ {} │ {} │ {}",
        expense.date, expense.amount, expense.category, expense.description, expense.payment_method
    );
    Ok(())
}

pub fn cmd_edit<S: KeyValueStore>(
    store: &mut ExpenseStore<S>,
    id: &str,
    amount: Option<f64>,
    category: Option<&str>,
    description: Option<&str>,
    payment: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let update = ExpenseUpdate {
        date: parse_date(date, "date")?,
        category: category.map(category_label),
        description: description.map(|d| d.trim().to_string()),
        amount,
        payment_method: payment.map(payment_label),
    };

    if update.is_empty() {
        println!("Nothing to change. Pass at least one of --amount, --category, --description, --payment, --date.");
        return Ok(());
    }

    match store.update(id, &update).context("Failed to update expense")? {
        Some(expense) => {
            println!("✅ Updated expense {}", expense.id);
            println!(
                "   {} │ ${:>9.2} │ {} │ {} │ {}",
                expense.date,
                expense.amount,
                expense.category,
                expense.description,
                expense.payment_method
            );
        }
        None => println!("⚠️  No expense with ID {}", id),
    }
    Ok(())
}

pub fn cmd_delete<S: KeyValueStore>(store: &mut ExpenseStore<S>, id: &str) -> Result<()> {
    let description = store.get(id).map(|e| e.description.clone());

    if store.delete(id).context("Failed to delete expense")? {
        println!(
            "🗑️  Deleted expense {} ({})",
            id,
            description.unwrap_or_default()
        );
    } else {
        println!("⚠️  No expense with ID {}", id);
    }
    Ok(())
}

/// Print matching expenses; returns the rows shown
pub fn cmd_list<S: KeyValueStore>(
    store: &ExpenseStore<S>,
    filter: &ExpenseFilter,
    limit: usize,
) -> Result<Vec<Expense>> {
    if store.is_empty() {
        println!("No expenses recorded yet. Add one with:");
        println!("  tally add -a 12.50 -c \"Food & Dining\" -d \"Lunch\"");
        return Ok(Vec::new());
    }

    let results = query::filter_and_search(store.expenses(), filter);
    if results.is_empty() {
        println!("No expenses match these filters.");
        return Ok(Vec::new());
    }

    println!();
    println!("📝 Expenses");
    println!("   ─────────────────────────────────────────────────────────────────────────────");

    let shown: Vec<Expense> = results.iter().take(limit).cloned().collect();
    for expense in &shown {
        println!(
            "   {} │ ${:>9.2} │ {:<17} │ {:<30} │ {:<14} │ {}",
            expense.date,
            expense.amount,
            truncate(&expense.category, 17),
            truncate(&expense.description, 30),
            truncate(&expense.payment_method, 14),
            expense.id
        );
    }

    if results.len() > limit {
        println!("   ... and {} more (use --limit to show more)", results.len() - limit);
    }

    let summary = FilteredSummary::of(&results);
    println!("   ─────────────────────────────────────────────────────────────────────────────");
    println!(
        "   {} expense{} │ Total ${:.2}",
        summary.count,
        if summary.count == 1 { "" } else { "s" },
        summary.total
    );

    Ok(shown)
}

/// A category or payment method value found in the records
#[derive(Debug, Clone, PartialEq)]
pub struct Usage {
    pub label: String,
    pub count: usize,
    pub total: f64,
}

fn usage_of(
    records: &[Expense],
    labels: Vec<String>,
    select: fn(&[Expense], &str) -> Vec<Expense>,
) -> Vec<Usage> {
    labels
        .into_iter()
        .map(|label| {
            let matching = select(records, &label);
            Usage {
                count: matching.len(),
                total: query::total_of(&matching),
                label,
            }
        })
        .collect()
}

fn print_usage(heading: &str, known: &[String], used: &[Usage]) {
    println!();
    println!("{}", heading);
    for label in known {
        match used.iter().find(|u| &u.label == label) {
            Some(u) => println!("   {:<20} │ {:>3} │ ${:>9.2}", label, u.count, u.total),
            None => println!("   {}", label),
        }
    }

    let custom: Vec<&Usage> = used.iter().filter(|u| !known.contains(&u.label)).collect();
    if !custom.is_empty() {
        println!("   Also in use:");
        for u in custom {
            println!(
                "   {:<20} │ {:>3} │ ${:>9.2}",
                truncate(&u.label, 20),
                u.count,
                u.total
            );
        }
    }
}

/// Print known categories and payment methods with usage figures
///
/// Returns the per-value usage for categories and payment methods in the
/// store, in that order.
pub fn cmd_categories<S: KeyValueStore>(
    store: &ExpenseStore<S>,
) -> Result<(Vec<Usage>, Vec<Usage>)> {
    let records = store.expenses();
    let categories = usage_of(
        records,
        query::distinct_categories(records),
        query::by_category,
    );
    let methods = usage_of(
        records,
        query::distinct_payment_methods(records),
        query::by_payment_method,
    );

    let known: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
    print_usage("🏷️  Categories", &known, &categories);

    let known: Vec<String> = PaymentMethod::ALL.iter().map(|m| m.to_string()).collect();
    print_usage("💳 Payment methods", &known, &methods);

    Ok((categories, methods))
}
