//! Pipeline module - load, label, aggregate and analyze the receivables tables

pub mod aggregate;
pub mod analysis;
pub mod cnae;
pub mod columns;
pub mod correlation;
pub mod dates;
pub mod distribution;
pub mod error;
pub mod filter;
pub mod labels;
pub mod loader;
pub mod outliers;
pub mod profile;
pub mod stats;
pub mod temporal;

pub use aggregate::*;
pub use analysis::*;
pub use cnae::*;
pub use correlation::*;
pub use distribution::*;
pub use error::*;
pub use filter::*;
pub use labels::*;
pub use loader::*;
pub use outliers::*;
pub use profile::*;
pub use stats::*;
pub use temporal::*;
