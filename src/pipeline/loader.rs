//! Loader for the invoice (boletos) and payer auxiliary tables
//!
//! Reads both files, normalizes types, fills the documented defaults and
//! left-joins the payer indicators onto every invoice.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::columns::{
    AUX_SCORE_COLUMNS, CD_CNAE_PRIN, DATE_COLUMNS, DT_EMISSAO, EM_ABERTO, ID_CNPJ, ID_PAGADOR,
    REQUIRED_INVOICE_COLUMNS, TIPO_BAIXA, TIPO_ESPECIE, VLR_BAIXA, VLR_NOMINAL,
};
use super::dates::parse_date_column;
use super::error::{EdaError, TableKind};
use super::labels::derive_labels;
use super::stats::has_column;

/// Temporary column used to restore invoice order after the join
const ROW_ORDER: &str = "__row_order";

/// Result of loading and preparing both input tables
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// Joined and labeled invoice table
    pub invoices: DataFrame,
    /// Rows read from the boletos file
    pub boletos_rows: usize,
    /// Rows read from the auxiliary file
    pub auxiliar_rows: usize,
    /// Optional columns absent from the inputs and filled with defaults
    pub filled_columns: Vec<String>,
}

impl LoadedDataset {
    /// Estimated in-memory size of the joined table in megabytes
    pub fn estimated_mb(&self) -> f64 {
        self.invoices.estimated_size() as f64 / (1024.0 * 1024.0)
    }
}

/// Load a table from a file (CSV or Parquet based on extension)
///
/// `infer_schema_length` applies to CSV only; 0 means a full table scan.
pub fn load_table(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => {
            return Err(EdaError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }
            .into())
        }
    };

    lf.collect()
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

fn require_columns(df: &DataFrame, table: TableKind, required: &[&str]) -> Result<()> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for column in required {
        if !present.iter().any(|name| name == column) {
            return Err(EdaError::MissingColumn {
                table,
                column: column.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Normalize the invoice table: string payer ids, parsed dates, open sentinel
/// for missing settlement types and zero for missing settlement amounts.
pub fn prepare_invoices(df: &DataFrame) -> Result<DataFrame> {
    require_columns(df, TableKind::Boletos, &REQUIRED_INVOICE_COLUMNS)?;

    let mut exprs = vec![
        col(ID_PAGADOR).cast(DataType::String),
        col(TIPO_BAIXA)
            .cast(DataType::String)
            .fill_null(lit(EM_ABERTO)),
        col(VLR_NOMINAL).cast(DataType::Float64),
    ];
    if has_column(df, VLR_BAIXA) {
        exprs.push(
            col(VLR_BAIXA)
                .cast(DataType::Float64)
                .fill_null(lit(0.0)),
        );
    }

    let mut prepared = df.clone().lazy().with_columns(exprs).collect()?;

    for name in DATE_COLUMNS {
        if has_column(&prepared, name) {
            let parsed = parse_date_column(prepared.column(name)?)?;
            prepared.with_column(parsed)?;
        }
    }

    Ok(prepared)
}

/// Normalize the auxiliary table: rename `id_cnpj` to the invoice payer key
/// and cast every known score column to `Float64`.
pub fn prepare_auxiliary(df: &DataFrame) -> Result<DataFrame> {
    require_columns(df, TableKind::Auxiliar, &[ID_CNPJ])?;

    let mut renamed = df.clone();
    renamed.rename(ID_CNPJ, ID_PAGADOR.into())?;

    let mut exprs = vec![col(ID_PAGADOR).cast(DataType::String)];
    for name in AUX_SCORE_COLUMNS {
        if has_column(&renamed, name) {
            exprs.push(col(name).cast(DataType::Float64));
        }
    }

    let prepared = renamed.lazy().with_columns(exprs).collect()?;
    Ok(prepared)
}

/// Left-join payer indicators onto invoices by `id_pagador`.
///
/// Invoice order is preserved. Auxiliary columns that also exist in the
/// invoice table are dropped so the invoice values win.
pub fn join_tables(invoices: &DataFrame, auxiliary: &DataFrame) -> Result<DataFrame> {
    let overlapping: Vec<String> = auxiliary
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|name| name != ID_PAGADOR && has_column(invoices, name))
        .collect();
    let auxiliary = auxiliary.drop_many(&overlapping);

    let ordered = invoices.with_row_index(ROW_ORDER.into(), None)?;

    let joined = ordered
        .lazy()
        .join(
            auxiliary.lazy(),
            [col(ID_PAGADOR)],
            [col(ID_PAGADOR)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([ROW_ORDER], SortMultipleOptions::default())
        .collect()
        .context("Failed to join boletos with auxiliary table")?;

    Ok(joined.drop(ROW_ORDER)?)
}

/// Add any optional column that neither input provided, returning the names added.
///
/// Dates and categorical codes become all-null, scores become all-null
/// `Float64`, and a missing `vlr_baixa` becomes zeros.
pub fn fill_optional_columns(df: &mut DataFrame) -> Result<Vec<String>> {
    let height = df.height();
    let mut added = Vec::new();

    if !has_column(df, DT_EMISSAO) {
        df.with_column(Column::full_null(DT_EMISSAO.into(), height, &DataType::Date))?;
        added.push(DT_EMISSAO.to_string());
    }
    for name in [TIPO_ESPECIE, CD_CNAE_PRIN] {
        if !has_column(df, name) {
            df.with_column(Column::full_null(name.into(), height, &DataType::String))?;
            added.push(name.to_string());
        }
    }
    if !has_column(df, VLR_BAIXA) {
        df.with_column(Column::new(VLR_BAIXA.into(), vec![0.0f64; height]))?;
        added.push(VLR_BAIXA.to_string());
    }
    for name in AUX_SCORE_COLUMNS {
        if !has_column(df, name) {
            df.with_column(Column::full_null(name.into(), height, &DataType::Float64))?;
            added.push(name.to_string());
        }
    }

    Ok(added)
}

/// Load both tables, join them and derive the invoice labels.
///
/// Any read or validation failure aborts before a partial table is produced.
pub fn load_and_prepare(
    boletos_path: &Path,
    auxiliar_path: &Path,
    infer_schema_length: usize,
) -> Result<LoadedDataset> {
    let boletos = load_table(boletos_path, infer_schema_length)?;
    if boletos.height() == 0 {
        return Err(EdaError::EmptyTable {
            table: TableKind::Boletos,
            path: boletos_path.to_path_buf(),
        }
        .into());
    }
    let auxiliar = load_table(auxiliar_path, infer_schema_length)?;

    let invoices = prepare_invoices(&boletos)?;
    let auxiliary = prepare_auxiliary(&auxiliar)?;

    let mut joined = join_tables(&invoices, &auxiliary)?;
    let filled_columns = fill_optional_columns(&mut joined)?;
    let labeled = derive_labels(&joined)?;

    Ok(LoadedDataset {
        invoices: labeled,
        boletos_rows: boletos.height(),
        auxiliar_rows: auxiliar.height(),
        filled_columns,
    })
}
