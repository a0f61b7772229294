//! Payer-level aggregation of the labeled invoice table

use anyhow::{Context, Result};
use polars::prelude::*;

use super::columns::{
    ALTO_RISCO, ID_PAGADOR, INADIMPLENTE, PAYER_MEAN_COLUMNS, QTD_BOLETOS, RISCO_ALTO,
    RISCO_BAIXO, TAXA_INADIMPLENCIA,
};
use super::stats::has_column;

/// Risk bucket for a payer given its default rate.
/// Any open invoice puts the whole payer in the high-risk bucket.
pub fn risk_bucket(taxa_inadimplencia: f64) -> &'static str {
    if taxa_inadimplencia > 0.0 {
        RISCO_ALTO
    } else {
        RISCO_BAIXO
    }
}

/// Group invoices by payer and average the default flag and payer indicators.
///
/// Produces one row per distinct non-null `id_pagador`, sorted by payer id.
/// A payer whose indicator is null on every invoice gets a null mean;
/// indicators absent from `df` are left out of the summary.
pub fn aggregate_by_payer(df: &DataFrame) -> Result<DataFrame> {
    let mut aggs = vec![
        len().alias(QTD_BOLETOS),
        col(INADIMPLENTE)
            .cast(DataType::Float64)
            .mean()
            .alias(TAXA_INADIMPLENCIA),
    ];
    for (source, output) in PAYER_MEAN_COLUMNS {
        if has_column(df, source) {
            aggs.push(col(source).cast(DataType::Float64).mean().alias(output));
        }
    }

    let mut summary = df
        .clone()
        .lazy()
        .filter(col(ID_PAGADOR).is_not_null())
        .group_by([col(ID_PAGADOR)])
        .agg(aggs)
        .sort([ID_PAGADOR], SortMultipleOptions::default())
        .collect()
        .context("Failed to aggregate invoices by payer")?;

    let buckets: Vec<&'static str> = summary
        .column(TAXA_INADIMPLENCIA)?
        .f64()?
        .into_iter()
        .map(|taxa| risk_bucket(taxa.unwrap_or(0.0)))
        .collect();
    summary.with_column(Column::new(ALTO_RISCO.into(), buckets))?;

    Ok(summary)
}
