//! boleto-eda: receivables default analysis library
//!
//! Loads an invoice table and a payer auxiliary table, labels each invoice
//! with its payment status and default flag, aggregates payers, and runs the
//! descriptive analyses behind the console and JSON reports.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
