//! Descriptive statistics and column helpers shared by the analyses

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::columns::{INADIMPLENTE, VLR_NOMINAL};

/// Read a column as `f64` values.
///
/// A column that is absent or cannot be cast to `Float64` is treated as all
/// null, so analyses over optional indicators degrade instead of failing.
pub fn optional_f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .ok()
        .and_then(|column| column.cast(&DataType::Float64).ok())
        .and_then(|column| {
            column
                .f64()
                .ok()
                .map(|ca| ca.into_iter().collect::<Vec<Option<f64>>>())
        })
        .unwrap_or_else(|| vec![None; df.height()])
}

/// Whether `df` has a column called `name`
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// A column as `Float64` with nulls and NaN removed
pub fn present_values(name: &str) -> Expr {
    col(name).cast(DataType::Float64).drop_nulls().drop_nans()
}

/// Quantile with linear interpolation between closest ranks
pub fn linear_quantile(values: Expr, q: f64) -> Expr {
    values.quantile(lit(q), QuantileMethod::Linear)
}

/// First value of a column as `f64`. Null, NaN and empty frames give `None`.
pub fn scalar_f64(df: &DataFrame, name: &str) -> Result<Option<f64>> {
    if df.height() == 0 {
        return Ok(None);
    }
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.get(0).filter(|v| !v.is_nan()))
}

/// First value of a count column, 0 for an empty frame
pub fn scalar_count(df: &DataFrame, name: &str) -> Result<usize> {
    if df.height() == 0 {
        return Ok(0);
    }
    let column = df.column(name)?.cast(&DataType::UInt64)?;
    Ok(column.u64()?.get(0).unwrap_or(0) as usize)
}

/// Invoice count and default rate of a (possibly filtered) invoice table
pub fn default_summary(invoices: LazyFrame) -> Result<(usize, Option<f64>)> {
    let summary = invoices
        .select([
            len().alias("invoices"),
            col(INADIMPLENTE).cast(DataType::Float64).mean().alias("rate"),
        ])
        .collect()?;
    Ok((
        scalar_count(&summary, "invoices")?,
        scalar_f64(&summary, "rate")?,
    ))
}

/// Quantile of a numeric column, ignoring nulls. Absent or empty columns give `None`.
pub fn column_quantile(df: &DataFrame, name: &str, q: f64) -> Result<Option<f64>> {
    if !has_column(df, name) {
        return Ok(None);
    }
    let out = df
        .clone()
        .lazy()
        .select([linear_quantile(present_values(name), q).alias(name)])
        .collect()?;
    scalar_f64(&out, name)
}

/// Summary statistics of a numeric column
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    pub column: String,
    /// Non-null observations
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1)
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
    pub sum: f64,
}

impl DescriptiveStats {
    fn empty(column: &str) -> Self {
        Self {
            column: column.to_string(),
            count: 0,
            mean: None,
            std: None,
            min: None,
            median: None,
            max: None,
            sum: 0.0,
        }
    }
}

/// Describe a column of the invoice table
pub fn describe_column(df: &DataFrame, name: &str) -> Result<DescriptiveStats> {
    if !has_column(df, name) {
        return Ok(DescriptiveStats::empty(name));
    }

    let values = || present_values(name);
    let summary = df
        .clone()
        .lazy()
        .select([
            values().count().alias("count"),
            values().mean().alias("mean"),
            values().std(1).alias("std"),
            values().min().alias("min"),
            values().median().alias("median"),
            values().max().alias("max"),
            values().sum().alias("sum"),
        ])
        .collect()
        .with_context(|| format!("Failed to describe column '{}'", name))?;

    let count = scalar_count(&summary, "count")?;
    Ok(DescriptiveStats {
        column: name.to_string(),
        count,
        mean: scalar_f64(&summary, "mean")?,
        std: scalar_f64(&summary, "std")?.filter(|_| count > 1),
        min: scalar_f64(&summary, "min")?,
        median: scalar_f64(&summary, "median")?,
        max: scalar_f64(&summary, "max")?,
        sum: scalar_f64(&summary, "sum")?.unwrap_or(0.0),
    })
}

/// Headline numbers for the whole invoice table
#[derive(Debug, Clone, Serialize)]
pub struct OverviewMetrics {
    pub total_invoices: usize,
    /// Fraction of invoices still open
    pub default_rate: Option<f64>,
    pub total_nominal_value: f64,
}

/// Compute the headline metrics
pub fn overview_metrics(df: &DataFrame) -> Result<OverviewMetrics> {
    let (total_invoices, default_rate) = default_summary(df.clone().lazy())?;
    let nominal = df
        .clone()
        .lazy()
        .select([present_values(VLR_NOMINAL).sum().alias(VLR_NOMINAL)])
        .collect()?;

    Ok(OverviewMetrics {
        total_invoices,
        default_rate,
        total_nominal_value: scalar_f64(&nominal, VLR_NOMINAL)?.unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> DataFrame {
        df! {
            "v" => [Some(1.0f64), Some(2.0), None, Some(3.0), Some(4.0), Some(f64::NAN)],
        }
        .unwrap()
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let df = values();
        assert_eq!(column_quantile(&df, "v", 0.0).unwrap(), Some(1.0));
        assert_eq!(column_quantile(&df, "v", 1.0).unwrap(), Some(4.0));
        assert!((column_quantile(&df, "v", 0.5).unwrap().unwrap() - 2.5).abs() < 1e-12);
        // position = 0.99 * 3 = 2.97
        assert!((column_quantile(&df, "v", 0.99).unwrap().unwrap() - 3.97).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_empty_is_none() {
        let df = df! { "v" => [None::<f64>, None] }.unwrap();
        assert_eq!(column_quantile(&df, "v", 0.5).unwrap(), None);
        assert_eq!(column_quantile(&df, "absent", 0.5).unwrap(), None);
    }

    #[test]
    fn test_describe_column() {
        let df = df! {
            "v" => [Some(2.0f64), Some(4.0), None, Some(6.0)],
        }
        .unwrap();
        let stats = describe_column(&df, "v").unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, Some(4.0));
        assert_eq!(stats.std, Some(2.0));
        assert_eq!(stats.min, Some(2.0));
        assert_eq!(stats.median, Some(4.0));
        assert_eq!(stats.max, Some(6.0));
        assert_eq!(stats.sum, 12.0);
    }

    #[test]
    fn test_describe_single_value_has_no_std() {
        let df = df! { "v" => [Some(5.0f64), None] }.unwrap();
        let stats = describe_column(&df, "v").unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, Some(5.0));
        assert!(stats.std.is_none());
    }

    #[test]
    fn test_describe_missing_column_is_empty() {
        let df = df! { "other" => [1.0f64] }.unwrap();
        let stats = describe_column(&df, "v").unwrap();
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_none());
        assert!(stats.std.is_none());
    }

    #[test]
    fn test_default_summary() {
        let df = df! { INADIMPLENTE => [1i32, 0, 0, 1] }.unwrap();
        assert_eq!(default_summary(df.clone().lazy()).unwrap(), (4, Some(0.5)));

        let none = df.lazy().filter(lit(false));
        assert_eq!(default_summary(none).unwrap(), (0, None));
    }
}
