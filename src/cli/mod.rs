//! CLI module - argument parsing and the export subcommand

mod args;
mod export;

pub use args::{validate_quantile, validate_unit_interval, Cli, Commands};
pub use export::run_export;
