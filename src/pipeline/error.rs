//! Error types for loading and preparing the receivables tables.
//!
//! Input problems are fatal: the loader returns one of these variants and
//! the pipeline stops before any analysis runs.

use std::path::PathBuf;

use thiserror::Error;

/// Which of the two input tables an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Invoice table (one row per boleto)
    Boletos,
    /// Payer auxiliary table (one row per payer)
    Auxiliar,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Boletos => write!(f, "boletos"),
            TableKind::Auxiliar => write!(f, "auxiliar"),
        }
    }
}

/// Errors raised while reading or validating the input tables.
#[derive(Debug, Error)]
pub enum EdaError {
    /// A column the pipeline depends on is absent from the input file.
    #[error("Required column '{column}' not found in {table} table")]
    MissingColumn { table: TableKind, column: String },

    /// Extension other than csv or parquet.
    #[error(
        "Unsupported file format: '{extension}' ({}). Supported formats: csv, parquet",
        .path.display()
    )]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// File parsed but holds no rows.
    #[error("The {table} table is empty: {}", .path.display())]
    EmptyTable { table: TableKind, path: PathBuf },
}
