//! Indicator distributions per risk group and low-liquidity payers without default

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::columns::{ALTO_RISCO, RISCO_ALTO, RISCO_BAIXO, SACADO_LIQUIDEZ_1M};
use super::stats::{has_column, linear_quantile, scalar_count, scalar_f64};

/// Five-number summary of one indicator within one risk group
#[derive(Debug, Clone, Serialize)]
pub struct GroupDistribution {
    pub group: String,
    pub count: usize,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl GroupDistribution {
    /// Read the summary row of `group`; a group with no row is empty
    fn from_summary(summary: &DataFrame, group: &str) -> Result<Self> {
        let row = summary
            .clone()
            .lazy()
            .filter(col(ALTO_RISCO).eq(lit(group)))
            .collect()?;
        Ok(Self {
            group: group.to_string(),
            count: scalar_count(&row, "count")?,
            min: scalar_f64(&row, "min")?,
            q1: scalar_f64(&row, "q1")?,
            median: scalar_f64(&row, "median")?,
            q3: scalar_f64(&row, "q3")?,
            max: scalar_f64(&row, "max")?,
        })
    }

    fn empty(group: &str) -> Self {
        Self {
            group: group.to_string(),
            count: 0,
            min: None,
            q1: None,
            median: None,
            q3: None,
            max: None,
        }
    }
}

/// Distribution of an indicator in the high- and low-risk payer groups
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorProfile {
    pub indicator: String,
    pub groups: Vec<GroupDistribution>,
}

fn indicator_profile(payers: &DataFrame, indicator: &str) -> Result<IndicatorProfile> {
    const GROUPS: [&str; 2] = [RISCO_ALTO, RISCO_BAIXO];

    if !has_column(payers, indicator) {
        return Ok(IndicatorProfile {
            indicator: indicator.to_string(),
            groups: GROUPS.iter().map(|g| GroupDistribution::empty(g)).collect(),
        });
    }

    let value = || col(indicator);
    let summary = payers
        .clone()
        .lazy()
        .select([
            col(ALTO_RISCO).cast(DataType::String),
            value().cast(DataType::Float64),
        ])
        .filter(value().is_not_null().and(value().is_not_nan()))
        .group_by([col(ALTO_RISCO)])
        .agg([
            len().alias("count"),
            value().min().alias("min"),
            linear_quantile(value(), 0.25).alias("q1"),
            value().median().alias("median"),
            linear_quantile(value(), 0.75).alias("q3"),
            value().max().alias("max"),
        ])
        .collect()?;

    let groups = GROUPS
        .iter()
        .map(|group| GroupDistribution::from_summary(&summary, group))
        .collect::<Result<Vec<_>>>()?;

    Ok(IndicatorProfile {
        indicator: indicator.to_string(),
        groups,
    })
}

/// Summarize each indicator per `alto_risco` group. Nulls are dropped per
/// indicator, so a payer missing one score still counts for the others.
pub fn risk_group_profiles(payers: &DataFrame, indicators: &[&str]) -> Result<Vec<IndicatorProfile>> {
    indicators
        .iter()
        .map(|indicator| indicator_profile(payers, indicator))
        .collect()
}

/// Payers with low one-month liquidity that currently have no open invoice
#[derive(Debug, Clone, Serialize)]
pub struct ExtremeCases {
    /// Liquidity below this value counts as low
    pub liquidity_threshold: f64,
    pub payers: usize,
}

/// Count payers with `sacado_indice_liquidez_1m < threshold` in the low-risk group.
/// Payers without a liquidity index are not counted.
pub fn low_liquidity_low_risk(payers: &DataFrame, threshold: f64) -> Result<ExtremeCases> {
    let count = if has_column(payers, SACADO_LIQUIDEZ_1M) {
        payers
            .clone()
            .lazy()
            .filter(
                col(SACADO_LIQUIDEZ_1M)
                    .cast(DataType::Float64)
                    .lt(lit(threshold))
                    .and(col(ALTO_RISCO).cast(DataType::String).eq(lit(RISCO_BAIXO))),
            )
            .collect()?
            .height()
    } else {
        0
    };

    Ok(ExtremeCases {
        liquidity_threshold: threshold,
        payers: count,
    })
}
