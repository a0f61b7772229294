//! Default rate of high-value invoices compared with the rest

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::columns::VLR_NOMINAL;
use super::stats::{column_quantile, default_summary};

/// Default rates split at a nominal-value quantile
#[derive(Debug, Clone, Serialize)]
pub struct OutlierAnalysis {
    /// Quantile used for the threshold (e.g. 0.99)
    pub quantile: f64,
    /// Nominal value at that quantile; `None` when no values are present
    pub threshold: Option<f64>,
    /// Invoices with nominal value strictly above the threshold
    pub outlier_invoices: usize,
    pub outlier_rate: Option<f64>,
    /// Invoices at or below the threshold
    pub regular_invoices: usize,
    pub regular_rate: Option<f64>,
    /// Rate over every invoice, including those without a nominal value
    pub overall_rate: Option<f64>,
}

impl OutlierAnalysis {
    /// How many times riskier the outliers are than the whole portfolio
    pub fn risk_multiplier(&self) -> Option<f64> {
        match (self.outlier_rate, self.overall_rate) {
            (Some(outlier), Some(overall)) if overall > 0.0 => Some(outlier / overall),
            _ => None,
        }
    }
}

/// Split invoices at the `q` quantile of `vlr_nominal` and compare default rates.
///
/// Invoices without a nominal value fall in neither group.
pub fn analyze_outliers(df: &DataFrame, q: f64) -> Result<OutlierAnalysis> {
    let threshold = column_quantile(df, VLR_NOMINAL, q)?;
    let nominal = || col(VLR_NOMINAL).cast(DataType::Float64);

    let ((outlier_invoices, outlier_rate), (regular_invoices, regular_rate)) = match threshold {
        Some(limit) => {
            let side = |above: bool| {
                let split = if above {
                    nominal().gt(lit(limit))
                } else {
                    nominal().lt_eq(lit(limit))
                };
                default_summary(df.clone().lazy().filter(split.and(nominal().is_not_nan())))
            };
            (side(true)?, side(false)?)
        }
        None => ((0, None), (0, None)),
    };
    let (_, overall_rate) = default_summary(df.clone().lazy())?;

    Ok(OutlierAnalysis {
        quantile: q,
        threshold,
        outlier_invoices,
        outlier_rate,
        regular_invoices,
        regular_rate,
        overall_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::columns::INADIMPLENTE;

    #[test]
    fn test_outliers_above_threshold_only() {
        // 0.5 quantile of [1, 2, 3, 4] is 2.5
        let df = df! {
            VLR_NOMINAL => [1.0f64, 2.0, 3.0, 4.0],
            INADIMPLENTE => [0i32, 0, 1, 0],
        }
        .unwrap();
        let analysis = analyze_outliers(&df, 0.5).unwrap();

        assert_eq!(analysis.threshold, Some(2.5));
        assert_eq!(analysis.outlier_invoices, 2);
        assert_eq!(analysis.outlier_rate, Some(0.5));
        assert_eq!(analysis.regular_invoices, 2);
        assert_eq!(analysis.regular_rate, Some(0.0));
        assert_eq!(analysis.overall_rate, Some(0.25));
        assert_eq!(analysis.risk_multiplier(), Some(2.0));
    }

    #[test]
    fn test_value_equal_to_threshold_is_regular() {
        let df = df! {
            VLR_NOMINAL => [5.0f64, 5.0, 5.0],
            INADIMPLENTE => [1i32, 0, 0],
        }
        .unwrap();
        let analysis = analyze_outliers(&df, 0.99).unwrap();

        assert_eq!(analysis.threshold, Some(5.0));
        assert_eq!(analysis.outlier_invoices, 0);
        assert!(analysis.outlier_rate.is_none());
        assert_eq!(analysis.regular_invoices, 3);
    }

    #[test]
    fn test_all_null_nominal_degrades() {
        let df = df! {
            VLR_NOMINAL => [None::<f64>, None],
            INADIMPLENTE => [1i32, 0],
        }
        .unwrap();
        let analysis = analyze_outliers(&df, 0.99).unwrap();

        assert!(analysis.threshold.is_none());
        assert_eq!(analysis.outlier_invoices, 0);
        assert_eq!(analysis.regular_invoices, 0);
        assert_eq!(analysis.overall_rate, Some(0.5));
        assert!(analysis.risk_multiplier().is_none());
    }
}
