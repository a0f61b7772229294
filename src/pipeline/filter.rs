//! Filtering the labeled invoice table and exporting it as CSV

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::columns::{STATUS_PAGAMENTO, TIPO_ESPECIE};
use super::stats::has_column;

/// Row filter over payment status and species.
///
/// `None` keeps every value; `Some(list)` keeps only rows whose value is in
/// the list (an empty list keeps nothing).
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub statuses: Option<Vec<String>>,
    pub species: Option<Vec<String>>,
}

impl InvoiceFilter {
    /// Build a filter from optional CLI lists, treating an empty list as "no filter"
    pub fn from_lists(statuses: &[String], species: &[String]) -> Self {
        let to_option = |values: &[String]| -> Option<Vec<String>> {
            if values.is_empty() {
                None
            } else {
                Some(values.iter().map(|v| v.trim().to_string()).collect())
            }
        };
        Self {
            statuses: to_option(statuses),
            species: to_option(species),
        }
    }

    /// Row mask for one column: no list keeps every row, a list keeps the
    /// non-null values it contains
    fn membership(df: &DataFrame, name: &str, allowed: &Option<Vec<String>>) -> Expr {
        match allowed {
            None => lit(true),
            Some(_) if !has_column(df, name) => lit(false),
            Some(list) => {
                let values = Series::new(name.into(), list.as_slice());
                col(name)
                    .cast(DataType::String)
                    .is_in(lit(values))
                    .fill_null(lit(false))
            }
        }
    }
}

/// Keep the rows matching `filter`, preserving row order and every column
pub fn filter_invoices(df: &DataFrame, filter: &InvoiceFilter) -> Result<DataFrame> {
    let keep = InvoiceFilter::membership(df, STATUS_PAGAMENTO, &filter.statuses)
        .and(InvoiceFilter::membership(df, TIPO_ESPECIE, &filter.species));

    df.clone()
        .lazy()
        .filter(keep)
        .collect()
        .context("Failed to filter invoice table")
}

/// Write a table to CSV with a header row
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut out = df.clone();
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut out)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}
