//! Monthly evolution of the default rate by issue date

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::columns::DT_EMISSAO;
use super::distribution::{group_default_rates, top_by_rate, GroupRate};
use super::stats::has_column;

/// Default rate per issue month
#[derive(Debug, Clone, Serialize)]
pub struct TemporalTrend {
    /// Every month with at least one invoice, ascending (`YYYY-MM`)
    pub monthly: Vec<GroupRate>,
    /// Highest-rate months, descending
    pub top_months: Vec<GroupRate>,
}

impl TemporalTrend {
    /// Month with the highest default rate, if any
    pub fn peak(&self) -> Option<&GroupRate> {
        self.top_months.first()
    }
}

/// Group invoices by calendar month of `dt_emissao`. Invoices without an
/// issue date are left out.
pub fn monthly_default_trend(df: &DataFrame, top_n: usize) -> Result<TemporalTrend> {
    if !has_column(df, DT_EMISSAO) {
        return Ok(TemporalTrend {
            monthly: Vec::new(),
            top_months: Vec::new(),
        });
    }

    // Keys are zero-padded, so lexical order is chronological.
    let month = col(DT_EMISSAO).cast(DataType::Date).dt().strftime("%Y-%m");
    let monthly = group_default_rates(df, month)?;
    let top_months = top_by_rate(&monthly, top_n);

    Ok(TemporalTrend {
        monthly,
        top_months,
    })
}
