//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::AnalysisConfig;

/// boleto-eda - Exploratory analysis of receivables default risk
#[derive(Parser, Debug)]
#[command(name = "boleto-eda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Invoice table (CSV or Parquet)
    #[arg(short, long, global = true, default_value = "base_boletos_fiap(in).csv")]
    pub boletos: PathBuf,

    /// Payer auxiliary table keyed by id_cnpj (CSV or Parquet)
    #[arg(short, long, global = true, default_value = "base_auxiliar_fiap(in).csv")]
    pub auxiliar: PathBuf,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (slow for large files).
    #[arg(long, global = true, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Nominal-value quantile above which an invoice counts as an outlier
    #[arg(long, default_value = "0.99", value_parser = validate_quantile)]
    pub outlier_quantile: f64,

    /// Minimum invoices for a CNAE category to be ranked
    #[arg(long, default_value = "50")]
    pub min_category_invoices: usize,

    /// Number of months and CNAE categories listed in the rankings
    #[arg(long, default_value = "5")]
    pub top_n: usize,

    /// Number of species listed in the species ranking
    #[arg(long, default_value = "10")]
    pub species_top_n: usize,

    /// One-month liquidity index below which a payer counts as low-liquidity
    #[arg(long, default_value = "0.5", value_parser = validate_unit_interval)]
    pub low_liquidity_threshold: f64,

    /// Write the full analysis report as JSON to this path
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter the labeled invoice table and write it as CSV
    Export {
        /// Output CSV path
        #[arg(short, long, default_value = "boletos_filtrados.csv")]
        output: PathBuf,

        /// Payment statuses to keep (comma-separated, e.g. "Em Aberto,Pago Atrasado").
        /// Keeps every status when omitted.
        #[arg(long, value_delimiter = ',')]
        status: Vec<String>,

        /// Invoice species to keep (comma-separated). Keeps every species when omitted.
        #[arg(long, value_delimiter = ',')]
        species: Vec<String>,
    },
}

impl Cli {
    /// Analysis parameters taken from the command line
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            outlier_quantile: self.outlier_quantile,
            min_category_invoices: self.min_category_invoices,
            top_n: self.top_n,
            species_top_n: self.species_top_n,
            low_liquidity_threshold: self.low_liquidity_threshold,
        }
    }
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not a valid number", s))
}

/// Validator for quantile parameters
pub fn validate_quantile(s: &str) -> Result<f64, String> {
    let value = parse_number(s)?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!("quantile must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for thresholds expressed on the 0..=1 scale
pub fn validate_unit_interval(s: &str) -> Result<f64, String> {
    let value = parse_number(s)?;
    if !value.is_finite() || value < 0.0 {
        Err(format!("threshold must be a non-negative number, got {}", value))
    } else if value > 1.0 {
        Err(format!("threshold must be at most 1.0, got {}", value))
    } else {
        Ok(value)
    }
}
