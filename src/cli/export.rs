//! Filtered CSV export of the labeled invoice table

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::pipeline::{filter_invoices, load_and_prepare, write_csv, InvoiceFilter, PaymentStatus};
use crate::utils::{create_spinner, print_warning};

/// Load and label both tables, filter by status and species, and write the result.
///
/// Unknown status names are rejected so a typo cannot silently export nothing.
pub fn run_export(
    boletos: &Path,
    auxiliar: &Path,
    output: &Path,
    filter: &InvoiceFilter,
    infer_schema_length: usize,
) -> Result<usize> {
    if let Some(statuses) = &filter.statuses {
        for status in statuses {
            status
                .parse::<PaymentStatus>()
                .map_err(anyhow::Error::msg)
                .context("Invalid --status value")?;
        }
    }

    println!("\n {} Exporting filtered invoices", style("◆").cyan().bold());
    println!("   Boletos:  {}", style(boletos.display()).dim());
    println!("   Auxiliar: {}", style(auxiliar.display()).dim());
    println!("   Output:   {}", style(output.display()).dim());
    println!();

    let spinner = create_spinner("Loading and labeling invoices...");
    let dataset = load_and_prepare(boletos, auxiliar, infer_schema_length)?;
    spinner.finish_with_message(format!(
        "{} Loaded {} invoices",
        style("✓").green(),
        dataset.invoices.height()
    ));
    for column in &dataset.filled_columns {
        print_warning(&format!("Column '{}' not found in inputs; filled with nulls", column));
    }

    let filtered = filter_invoices(&dataset.invoices, &filter_with_canonical_status(filter))?;

    let spinner = create_spinner("Writing CSV...");
    write_csv(&filtered, output)?;
    spinner.finish_with_message(format!("{} CSV written", style("✓").green()));

    println!();
    println!(
        "   {} of {} rows × {} columns",
        style(filtered.height()).yellow(),
        style(dataset.invoices.height()).yellow(),
        style(filtered.width()).yellow()
    );
    println!();
    println!(" {} Export complete!", style("✓").green().bold());

    Ok(filtered.height())
}

/// Status names are matched case-insensitively on input but stored with
/// their canonical capitalization in the table.
fn filter_with_canonical_status(filter: &InvoiceFilter) -> InvoiceFilter {
    let statuses = filter.statuses.as_ref().map(|list| {
        list.iter()
            .map(|s| {
                s.parse::<PaymentStatus>()
                    .map(|status| status.label().to_string())
                    .unwrap_or_else(|_| s.clone())
            })
            .collect()
    });
    InvoiceFilter {
        statuses,
        species: filter.species.clone(),
    }
}
