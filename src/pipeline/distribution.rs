//! Payment status distribution and default rates by group

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::columns::{INADIMPLENTE, STATUS_PAGAMENTO, TIPO_ESPECIE};
use super::stats::has_column;

/// Column holding the derived group key during aggregation
const GROUP_KEY: &str = "__group_key";

/// Default rate of one group of invoices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRate {
    pub key: String,
    pub invoices: usize,
    pub defaults: usize,
    /// Fraction of the group's invoices still open
    pub rate: f64,
}

/// Default rate per distinct value of `key`, ordered by key ascending.
///
/// `key` is any expression over the invoice table; rows where it evaluates
/// to null are skipped.
pub fn group_default_rates(df: &DataFrame, key: Expr) -> Result<Vec<GroupRate>> {
    let grouped = df
        .clone()
        .lazy()
        .select([
            key.cast(DataType::String).alias(GROUP_KEY),
            col(INADIMPLENTE).cast(DataType::Int64),
        ])
        .filter(col(GROUP_KEY).is_not_null())
        .group_by([col(GROUP_KEY)])
        .agg([
            len().alias("invoices"),
            col(INADIMPLENTE).sum().alias("defaults"),
            col(INADIMPLENTE).cast(DataType::Float64).mean().alias("rate"),
        ])
        .sort([GROUP_KEY], SortMultipleOptions::default())
        .collect()?;

    let keys = grouped.column(GROUP_KEY)?.cast(&DataType::String)?;
    let invoices = grouped.column("invoices")?.cast(&DataType::UInt64)?;
    let defaults = grouped.column("defaults")?.cast(&DataType::UInt64)?;
    let rates = grouped.column("rate")?.cast(&DataType::Float64)?;

    let groups = keys
        .str()?
        .into_iter()
        .zip(invoices.u64()?.into_iter())
        .zip(defaults.u64()?.into_iter())
        .zip(rates.f64()?.into_iter())
        .filter_map(|(((key, invoices), defaults), rate)| {
            Some(GroupRate {
                key: key?.to_string(),
                invoices: invoices.unwrap_or(0) as usize,
                defaults: defaults.unwrap_or(0) as usize,
                rate: rate.unwrap_or(0.0),
            })
        })
        .collect();

    Ok(groups)
}

/// Sort groups by rate descending and keep the first `n`.
/// Ties keep their incoming order.
pub fn top_by_rate(groups: &[GroupRate], n: usize) -> Vec<GroupRate> {
    let mut ranked = groups.to_vec();
    ranked.sort_by(|a, b| b.rate.partial_cmp(&a.rate).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(n);
    ranked
}

/// Share of invoices in one payment status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    pub status: String,
    pub count: usize,
    /// Percentage of all invoices (0-100)
    pub percent: f64,
}

/// Count invoices per `status_pagamento`, most frequent first (ties by name)
pub fn status_distribution(df: &DataFrame) -> Result<Vec<StatusShare>> {
    let counts = df
        .clone()
        .lazy()
        .select([col(STATUS_PAGAMENTO).cast(DataType::String)])
        .filter(col(STATUS_PAGAMENTO).is_not_null())
        .group_by([col(STATUS_PAGAMENTO)])
        .agg([len().alias("count")])
        .sort(
            ["count", STATUS_PAGAMENTO],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;

    let statuses = counts.column(STATUS_PAGAMENTO)?.cast(&DataType::String)?;
    let sizes = counts.column("count")?.cast(&DataType::UInt64)?;
    let pairs: Vec<(String, usize)> = statuses
        .str()?
        .into_iter()
        .zip(sizes.u64()?.into_iter())
        .filter_map(|(status, count)| Some((status?.to_string(), count? as usize)))
        .collect();
    let total: usize = pairs.iter().map(|(_, count)| count).sum();

    Ok(pairs
        .into_iter()
        .map(|(status, count)| StatusShare {
            status,
            count,
            percent: count as f64 / total as f64 * 100.0,
        })
        .collect())
}

/// Default rate per species (`tipo_especie`), highest first, limited to `top_n`
pub fn species_default_rates(df: &DataFrame, top_n: usize) -> Result<Vec<GroupRate>> {
    if !has_column(df, TIPO_ESPECIE) {
        return Ok(Vec::new());
    }
    let groups = group_default_rates(df, col(TIPO_ESPECIE))?;
    Ok(top_by_rate(&groups, top_n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_default_rates_skips_null_keys() {
        let df = df! {
            TIPO_ESPECIE => [Some("NP"), Some("DM"), None, Some("DM")],
            INADIMPLENTE => [0i32, 1, 1, 0],
        }
        .unwrap();
        let groups = group_default_rates(&df, col(TIPO_ESPECIE)).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "DM");
        assert_eq!(groups[0].invoices, 2);
        assert_eq!(groups[0].defaults, 1);
        assert_eq!(groups[0].rate, 0.5);
        assert_eq!(groups[1].key, "NP");
        assert_eq!(groups[1].rate, 0.0);
    }

    #[test]
    fn test_top_by_rate_orders_and_truncates() {
        let groups = vec![
            GroupRate { key: "a".into(), invoices: 10, defaults: 1, rate: 0.1 },
            GroupRate { key: "b".into(), invoices: 10, defaults: 5, rate: 0.5 },
            GroupRate { key: "c".into(), invoices: 10, defaults: 3, rate: 0.3 },
        ];
        let top = top_by_rate(&groups, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].key, "b");
        assert_eq!(top[1].key, "c");
    }

    #[test]
    fn test_status_distribution_percentages() {
        let df = df! {
            STATUS_PAGAMENTO => ["Pago em Dia", "Pago em Dia", "Pago em Dia", "Em Aberto"],
        }
        .unwrap();
        let shares = status_distribution(&df).unwrap();
        assert_eq!(shares[0].status, "Pago em Dia");
        assert_eq!(shares[0].count, 3);
        assert!((shares[0].percent - 75.0).abs() < 1e-9);
        assert!((shares[1].percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_status_ties_ordered_by_name() {
        let df = df! {
            STATUS_PAGAMENTO => [Some("Pago em Dia"), Some("Em Aberto"), None],
        }
        .unwrap();
        let shares = status_distribution(&df).unwrap();
        let order: Vec<&str> = shares.iter().map(|s| s.status.as_str()).collect();
        assert_eq!(order, vec!["Em Aberto", "Pago em Dia"]);
        assert!((shares[0].percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_species_absent_column_is_empty() {
        let df = df! { INADIMPLENTE => [1i32, 0] }.unwrap();
        assert!(species_default_rates(&df, 5).unwrap().is_empty());
    }
}
