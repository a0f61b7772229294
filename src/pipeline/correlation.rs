//! Pearson correlation between payer default rates and payer indicators

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::columns::{
    EDA_CORRELATION_COLUMNS, LIQUIDITY_CORRELATION_COLUMNS, RISK_CORRELATION_COLUMNS,
    TAXA_INADIMPLENCIA,
};
use super::stats::optional_f64_values;

/// Correlation of one indicator with the anchor column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorCorrelation {
    pub column: String,
    pub correlation: Option<f64>,
}

/// Square correlation matrix over a fixed set of columns
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation of `columns[i]` with `columns[j]`;
    /// `None` where it is undefined
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    /// Correlations of every column with `anchor`, descending, undefined last
    pub fn anchored_on(&self, anchor: &str) -> Vec<AnchorCorrelation> {
        let Some(i) = self.columns.iter().position(|c| c == anchor) else {
            return Vec::new();
        };

        let mut entries: Vec<AnchorCorrelation> = self
            .columns
            .iter()
            .zip(self.values[i].iter())
            .map(|(column, value)| AnchorCorrelation {
                column: column.clone(),
                correlation: *value,
            })
            .collect();

        entries.sort_by(|a, b| match (a.correlation, b.correlation) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        entries
    }
}

/// A correlation matrix together with the ranking of its anchor column
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationView {
    pub anchor: String,
    #[serde(flatten)]
    pub matrix: CorrelationMatrix,
    /// Every other column's correlation with `anchor`, descending, undefined last
    pub anchored: Vec<AnchorCorrelation>,
}

impl CorrelationView {
    pub fn new(matrix: CorrelationMatrix, anchor: &str) -> Self {
        let anchored = matrix
            .anchored_on(anchor)
            .into_iter()
            .filter(|entry| entry.column != anchor)
            .collect();
        Self {
            anchor: anchor.to_string(),
            matrix,
            anchored,
        }
    }
}

/// The three correlation views over the payer summary, anchored on the default rate
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    /// Default rate vs materiality/quantity scores and historical delay
    pub initial: CorrelationView,
    /// Default rate vs additional risk indicators
    pub risk: CorrelationView,
    /// Default rate vs one-month liquidity indices
    pub liquidity: CorrelationView,
}

/// Pearson correlation over pairwise-complete observations.
///
/// Uses a single-pass Welford update for numerical stability. Returns `None`
/// with fewer than two complete pairs or when either side is constant.
pub fn pearson_correlation(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (a, b) in x.iter().zip(y.iter()) {
        if let (Some(a), Some(b)) = (a, b) {
            if a.is_nan() || b.is_nan() {
                continue;
            }
            n += 1.0;
            let dx = a - mean_x;
            let dy = b - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            var_x += dx * (a - mean_x);
            var_y += dy * (b - mean_y);
            cov_xy += dx * (b - mean_y);
        }
    }

    if n < 2.0 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let r = cov_xy / (var_x.sqrt() * var_y.sqrt());
    Some(r.clamp(-1.0, 1.0))
}

/// Correlation matrix over the named columns of `df`.
///
/// Absent or all-null columns produce rows and columns of `None`.
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> CorrelationMatrix {
    let data: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|name| optional_f64_values(df, name))
        .collect();

    let values = (0..columns.len())
        .map(|i| {
            (0..columns.len())
                .map(|j| pearson_correlation(&data[i], &data[j]))
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    }
}

/// Compute the initial, risk and liquidity correlation matrices over the payer summary
pub fn payer_correlations(payers: &DataFrame) -> Result<CorrelationReport> {
    if payers.column(TAXA_INADIMPLENCIA).is_err() {
        anyhow::bail!(
            "Payer summary has no '{}' column - aggregate invoices first",
            TAXA_INADIMPLENCIA
        );
    }

    let view = |columns: &[&str]| {
        CorrelationView::new(correlation_matrix(payers, columns), TAXA_INADIMPLENCIA)
    };

    Ok(CorrelationReport {
        initial: view(&EDA_CORRELATION_COLUMNS),
        risk: view(&RISK_CORRELATION_COLUMNS),
        liquidity: view(&LIQUIDITY_CORRELATION_COLUMNS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|v| Some(*v)).collect()
    }

    #[test]
    fn test_perfect_positive_and_negative() {
        let x = some(&[1.0, 2.0, 3.0, 4.0]);
        let y = some(&[2.0, 4.0, 6.0, 8.0]);
        let z = some(&[4.0, 3.0, 2.0, 1.0]);
        assert!((pearson_correlation(&x, &y).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson_correlation(&x, &z).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_complete_ignores_nulls() {
        let x = vec![Some(1.0), Some(2.0), None, Some(3.0)];
        let y = vec![Some(1.0), Some(2.0), Some(100.0), Some(3.0)];
        assert!((pearson_correlation(&x, &y).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_or_short_is_undefined() {
        let x = some(&[1.0, 2.0, 3.0]);
        let constant = some(&[5.0, 5.0, 5.0]);
        assert!(pearson_correlation(&x, &constant).is_none());
        assert!(pearson_correlation(&[Some(1.0)], &[Some(2.0)]).is_none());
        assert!(pearson_correlation(&[None, None], &[None, None]).is_none());
    }

    #[test]
    fn test_anchored_on_sorts_undefined_last() {
        let matrix = CorrelationMatrix {
            columns: vec!["t".into(), "a".into(), "b".into()],
            values: vec![
                vec![Some(1.0), Some(-0.4), None],
                vec![Some(-0.4), Some(1.0), None],
                vec![None, None, None],
            ],
        };
        let anchored = matrix.anchored_on("t");
        let order: Vec<&str> = anchored.iter().map(|e| e.column.as_str()).collect();
        assert_eq!(order, vec!["t", "a", "b"]);
        assert!(matrix.anchored_on("missing").is_empty());
    }

    #[test]
    fn test_view_ranks_other_columns() {
        let matrix = CorrelationMatrix {
            columns: vec!["t".into(), "a".into(), "b".into()],
            values: vec![
                vec![Some(1.0), Some(-0.4), Some(0.7)],
                vec![Some(-0.4), Some(1.0), Some(0.1)],
                vec![Some(0.7), Some(0.1), Some(1.0)],
            ],
        };
        let view = CorrelationView::new(matrix, "t");
        assert_eq!(
            view.anchored,
            vec![
                AnchorCorrelation { column: "b".into(), correlation: Some(0.7) },
                AnchorCorrelation { column: "a".into(), correlation: Some(-0.4) },
            ]
        );
    }
}
