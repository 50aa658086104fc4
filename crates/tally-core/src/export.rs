//! Export of expense lists
//!
//! Supports:
//! - CSV with one row per expense
//! - JSON in the same layout as the persisted `expenses` document

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::models::Expense;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

const CSV_HEADER: [&str; 7] = [
    "id",
    "date",
    "category",
    "description",
    "amount",
    "payment_method",
    "created_at",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    date: String,
    category: &'a str,
    description: &'a str,
    amount: String,
    payment_method: &'a str,
    created_at: String,
}

/// Write `records` as CSV (header included)
pub fn export_csv<W: Write>(records: &[Expense], writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for expense in records {
        csv.serialize(CsvRow {
            id: &expense.id,
            date: expense.date.to_string(),
            category: &expense.category,
            description: &expense.description,
            amount: format!("{:.2}", expense.amount),
            payment_method: &expense.payment_method,
            created_at: expense.created_at.to_rfc3339(),
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// CSV export into a string
pub fn export_csv_string(records: &[Expense]) -> Result<String> {
    let mut buf = Vec::new();
    export_csv(records, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Pretty-printed JSON array of records
pub fn export_json(records: &[Expense]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Render `records` in `format`
pub fn export(records: &[Expense], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => export_csv_string(records),
        ExportFormat::Json => export_json(records),
    }
}
