//! Default rate by economic-activity category (CNAE, first 4 digits)

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::columns::CD_CNAE_PRIN;
use super::distribution::{group_default_rates, top_by_rate, GroupRate};
use super::stats::has_column;

/// Characters of the CNAE code kept as the category key
pub const CNAE_PREFIX_LEN: usize = 4;

/// Default rates per CNAE category with enough invoices
#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    /// Minimum invoices a category needs to be reported
    pub min_invoices: usize,
    /// Categories meeting the minimum, highest rate first
    pub eligible: Vec<GroupRate>,
    /// First `top_n` of `eligible`
    pub top_categories: Vec<GroupRate>,
    /// Categories dropped for having too few invoices
    pub excluded_categories: usize,
}

/// Category key expression over a CNAE code column.
///
/// Float codes (numeric columns with nulls) are cast through `Int64` first so
/// the key never picks up a decimal part.
pub fn cnae_category(code: Expr, dtype: &DataType) -> Expr {
    let code = if dtype.is_float() {
        code.cast(DataType::Int64)
    } else {
        code
    };
    code.cast(DataType::String)
        .str()
        .strip_chars(lit(NULL))
        .str()
        .slice(lit(0), lit(CNAE_PREFIX_LEN as u64))
}

/// Default rate per 4-digit CNAE category, keeping only categories with at
/// least `min_invoices` invoices.
///
/// Invoices with a null or blank code form no category at all; they are not
/// grouped under a placeholder key such as "nan".
pub fn cnae_default_rates(
    df: &DataFrame,
    min_invoices: usize,
    top_n: usize,
) -> Result<CategoryBreakdown> {
    let all_groups: Vec<GroupRate> = if has_column(df, CD_CNAE_PRIN) {
        let dtype = df.column(CD_CNAE_PRIN)?.dtype().clone();
        group_default_rates(df, cnae_category(col(CD_CNAE_PRIN), &dtype))?
            .into_iter()
            .filter(|g| !g.key.is_empty())
            .collect()
    } else {
        Vec::new()
    };
    let total_groups = all_groups.len();

    let valid: Vec<GroupRate> = all_groups
        .into_iter()
        .filter(|g| g.invoices >= min_invoices)
        .collect();
    let excluded_categories = total_groups - valid.len();

    let eligible = top_by_rate(&valid, valid.len());
    let top_categories = top_by_rate(&eligible, top_n);

    Ok(CategoryBreakdown {
        min_invoices,
        eligible,
        top_categories,
        excluded_categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::columns::INADIMPLENTE;

    fn categories(df: &DataFrame) -> Vec<Option<String>> {
        let dtype = df.column(CD_CNAE_PRIN).unwrap().dtype().clone();
        let out = df
            .clone()
            .lazy()
            .select([cnae_category(col(CD_CNAE_PRIN), &dtype)])
            .collect()
            .unwrap();
        out.column(CD_CNAE_PRIN)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn test_cnae_category_truncates() {
        let df = df! { CD_CNAE_PRIN => ["5611201", "56", " 2222600 "] }.unwrap();
        assert_eq!(
            categories(&df),
            vec![Some("5611".into()), Some("56".into()), Some("2222".into())]
        );
    }

    #[test]
    fn test_float_codes_lose_decimal_part() {
        let df = df! { CD_CNAE_PRIN => [Some(5611201.0f64), None, Some(620.0)] }.unwrap();
        assert_eq!(categories(&df), vec![Some("5611".into()), None, Some("620".into())]);
    }

    #[test]
    fn test_null_codes_form_no_category() {
        let df = df! {
            CD_CNAE_PRIN => [Some("4711302"), None, Some("4711302"), Some("")],
            INADIMPLENTE => [1i32, 1, 0, 1],
        }
        .unwrap();
        let breakdown = cnae_default_rates(&df, 1, 5).unwrap();

        assert_eq!(breakdown.eligible.len(), 1);
        assert_eq!(breakdown.eligible[0].key, "4711");
        assert_eq!(breakdown.eligible[0].invoices, 2);
        assert_eq!(breakdown.excluded_categories, 0);
        assert!(breakdown.eligible.iter().all(|g| g.key != "nan"));
    }
}
