//! Runs every analysis over the labeled invoices and the payer summary

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::cnae::{cnae_default_rates, CategoryBreakdown};
use super::columns::{PROFILE_COLUMNS, VLR_BAIXA, VLR_NOMINAL};
use super::correlation::{payer_correlations, CorrelationReport};
use super::distribution::{species_default_rates, status_distribution, GroupRate, StatusShare};
use super::outliers::{analyze_outliers, OutlierAnalysis};
use super::profile::{low_liquidity_low_risk, risk_group_profiles, ExtremeCases, IndicatorProfile};
use super::stats::{describe_column, overview_metrics, DescriptiveStats, OverviewMetrics};
use super::temporal::{monthly_default_trend, TemporalTrend};

/// Tunable parameters of the analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Nominal-value quantile separating outliers
    pub outlier_quantile: f64,
    /// Minimum invoices for a CNAE category to be reported
    pub min_category_invoices: usize,
    /// Months and categories listed in the rankings
    pub top_n: usize,
    /// Species listed in the species ranking
    pub species_top_n: usize,
    /// One-month payer liquidity below this value counts as low
    pub low_liquidity_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            outlier_quantile: 0.99,
            min_category_invoices: 50,
            top_n: 5,
            species_top_n: 10,
            low_liquidity_threshold: 0.5,
        }
    }
}

/// Every analysis result, in presentation order
#[derive(Debug, Clone, Serialize)]
pub struct EdaReport {
    pub overview: OverviewMetrics,
    pub payers: usize,
    pub status_distribution: Vec<StatusShare>,
    pub value_stats: Vec<DescriptiveStats>,
    pub species: Vec<GroupRate>,
    pub outliers: OutlierAnalysis,
    pub temporal: TemporalTrend,
    pub cnae: CategoryBreakdown,
    pub correlations: CorrelationReport,
    pub risk_profiles: Vec<IndicatorProfile>,
    pub extreme_cases: ExtremeCases,
}

/// Run all analyses. `invoices` is the labeled joined table and `payers` the
/// output of `aggregate_by_payer`.
pub fn run_analysis(
    invoices: &DataFrame,
    payers: &DataFrame,
    config: &AnalysisConfig,
) -> Result<EdaReport> {
    Ok(EdaReport {
        overview: overview_metrics(invoices)?,
        payers: payers.height(),
        status_distribution: status_distribution(invoices)?,
        value_stats: vec![
            describe_column(invoices, VLR_NOMINAL)?,
            describe_column(invoices, VLR_BAIXA)?,
        ],
        species: species_default_rates(invoices, config.species_top_n)?,
        outliers: analyze_outliers(invoices, config.outlier_quantile)?,
        temporal: monthly_default_trend(invoices, config.top_n)?,
        cnae: cnae_default_rates(invoices, config.min_category_invoices, config.top_n)?,
        correlations: payer_correlations(payers)?,
        risk_profiles: risk_group_profiles(payers, &PROFILE_COLUMNS)?,
        extreme_cases: low_liquidity_low_risk(payers, config.low_liquidity_threshold)?,
    })
}
