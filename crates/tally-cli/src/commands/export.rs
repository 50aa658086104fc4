//! Export command implementation

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::export::{self, ExportFormat};
use tally_core::query::{self, ExpenseFilter};
use tally_core::{ExpenseStore, KeyValueStore};

/// Export the records matching `filter`, newest first when filtered
///
/// An empty filter exports the store in its stored order.
pub fn cmd_export<S: KeyValueStore>(
    store: &ExpenseStore<S>,
    filter: &ExpenseFilter,
    format: &str,
    output: Option<&Path>,
) -> Result<usize> {
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let selected;
    let records = if filter.is_empty() {
        store.expenses()
    } else {
        selected = query::filter_and_search(store.expenses(), filter);
        selected.as_slice()
    };

    match output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            match format {
                ExportFormat::Csv => export::export_csv(records, &mut file)?,
                ExportFormat::Json => {
                    let json = export::export_json(records)?;
                    writeln!(file, "{}", json)?;
                }
            }
            eprintln!("✅ Exported {} expenses to {}", records.len(), path.display());
        }
        None => {
            let content = export::export(records, format)?;
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}", content)?;
            if format == ExportFormat::Json {
                writeln!(stdout)?;
            }
        }
    }

    Ok(records.len())
}
