//! JSON export of the analysis report

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{AnalysisConfig, EdaReport};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    pub tool_version: String,
    pub boletos_file: String,
    pub auxiliar_file: String,
    /// Rows read from each input before the join
    pub boletos_rows: usize,
    pub auxiliar_rows: usize,
    /// Optional columns absent from both inputs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filled_columns: Vec<String>,
    pub config: AnalysisConfig,
}

/// Report file layout: metadata followed by every analysis result
#[derive(Serialize)]
pub struct EdaReportExport<'a> {
    pub metadata: ReportMetadata,
    pub report: &'a EdaReport,
}

/// Parameters recorded in the export metadata
pub struct ExportParams<'a> {
    pub boletos_file: &'a str,
    pub auxiliar_file: &'a str,
    pub boletos_rows: usize,
    pub auxiliar_rows: usize,
    pub filled_columns: &'a [String],
    pub config: &'a AnalysisConfig,
}

/// Write the report as pretty-printed JSON
pub fn export_report(report: &EdaReport, output_path: &Path, params: &ExportParams) -> Result<()> {
    let export = EdaReportExport {
        metadata: ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            boletos_file: params.boletos_file.to_string(),
            auxiliar_file: params.auxiliar_file.to_string(),
            boletos_rows: params.boletos_rows,
            auxiliar_rows: params.auxiliar_rows,
            filled_columns: params.filled_columns.to_vec(),
            config: params.config.clone(),
        },
        report,
    };

    let json = serde_json::to_string_pretty(&export).context("Failed to serialize report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    Ok(())
}
