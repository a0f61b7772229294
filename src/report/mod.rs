//! Report module - console tables and JSON export of the analysis

pub mod eda_export;
pub mod summary;

pub use eda_export::*;
pub use summary::*;
