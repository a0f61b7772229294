//! boleto-eda: receivables default analysis CLI
//!
//! Loads the invoice and payer tables, derives default labels, and prints
//! the exploratory analysis as console tables (optionally as JSON too).

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use boleto_eda::cli::{run_export, Cli, Commands};
use boleto_eda::pipeline::{aggregate_by_payer, load_and_prepare, run_analysis, InvoiceFilter};
use boleto_eda::report::{display_report, export_report, ExportParams};
use boleto_eda::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = &cli.command {
        return match command {
            Commands::Export {
                output,
                status,
                species,
            } => {
                let filter = InvoiceFilter::from_lists(status, species);
                run_export(
                    &cli.boletos,
                    &cli.auxiliar,
                    output,
                    &filter,
                    cli.infer_schema_length,
                )
                .map(|_| ())
            }
        };
    }

    let config = cli.analysis_config();
    let run_start = Instant::now();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.boletos, &cli.auxiliar, cli.report.as_deref(), &config);

    // Step 1: load, join and label
    print_step_header(1, "Load & Label Invoices");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading and joining tables...");
    let dataset = load_and_prepare(&cli.boletos, &cli.auxiliar, cli.infer_schema_length)?;
    if dataset.filled_columns.is_empty() {
        finish_with_success(&spinner, "Tables joined and labeled");
    } else {
        finish_with_warning(&spinner, "Tables joined with missing optional columns");
    }

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Invoices: {}", dataset.boletos_rows);
    println!("      Payer records: {}", dataset.auxiliar_rows);
    println!("      Columns after join: {}", dataset.invoices.width());
    println!("      Estimated memory: {:.2} MB", dataset.estimated_mb());
    for column in &dataset.filled_columns {
        print_warning(&format!(
            "Column '{}' not found in inputs; filled with nulls",
            column
        ));
    }
    print_step_time(step_start.elapsed());

    // Step 2: payer aggregation
    print_step_header(2, "Payer Aggregation");
    let step_start = Instant::now();
    let spinner = create_spinner("Aggregating invoices by payer...");
    let payers = aggregate_by_payer(&dataset.invoices)?;
    finish_with_success(&spinner, "Payer summary built");
    print_count("distinct payers", payers.height(), None);
    print_step_time(step_start.elapsed());

    // Step 3: analyses
    print_step_header(3, "Exploratory Analysis");
    let step_start = Instant::now();
    let spinner = create_spinner("Running analyses...");
    let report = run_analysis(&dataset.invoices, &payers, &config)?;
    finish_with_success(&spinner, "Analyses complete");
    print_count(
        "CNAE categories",
        report.cnae.eligible.len(),
        Some(&format!("(>= {} invoices)", config.min_category_invoices)),
    );
    print_step_time(step_start.elapsed());

    display_report(&report);

    if let Some(path) = &cli.report {
        print_step_header(4, "Export Report");
        let boletos_file = cli.boletos.display().to_string();
        let auxiliar_file = cli.auxiliar.display().to_string();
        export_report(
            &report,
            path,
            &ExportParams {
                boletos_file: &boletos_file,
                auxiliar_file: &auxiliar_file,
                boletos_rows: dataset.boletos_rows,
                auxiliar_rows: dataset.auxiliar_rows,
                filled_columns: &dataset.filled_columns,
                config: &config,
            },
        )?;
        print_success(&format!("Report written to {}", path.display()));
    } else {
        print_info("Use --report <file.json> to save the full analysis");
    }

    print_completion(run_start.elapsed());
    Ok(())
}
