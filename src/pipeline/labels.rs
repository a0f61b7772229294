//! Payment status, days-late and default labels for each invoice
//!
//! An invoice is in default (`inadimplente = 1`) only while it is still open.
//! Invoices paid after the due date are labeled "Pago Atrasado" but do not
//! count as default.

use anyhow::Result;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

use super::columns::{
    DIAS_ATRASO, DT_PAGAMENTO, DT_VENCIMENTO, EM_ABERTO, INADIMPLENTE, PAGO_ATRASADO,
    PAGO_EM_DIA, STATUS_PAGAMENTO, TIPO_BAIXA,
};
use super::dates::date_values;

/// Payment status of a single invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PaymentStatus {
    /// Not settled yet (settlement type is the open sentinel)
    #[serde(rename = "Em Aberto")]
    EmAberto,
    /// Settled after the due date
    #[serde(rename = "Pago Atrasado")]
    PagoAtrasado,
    /// Settled on or before the due date, or with no comparable dates
    #[serde(rename = "Pago em Dia")]
    PagoEmDia,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::EmAberto,
        PaymentStatus::PagoAtrasado,
        PaymentStatus::PagoEmDia,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::EmAberto => EM_ABERTO,
            PaymentStatus::PagoAtrasado => PAGO_ATRASADO,
            PaymentStatus::PagoEmDia => PAGO_EM_DIA,
        }
    }

    /// Binary default flag for this status
    pub fn default_flag(&self) -> i32 {
        match self {
            PaymentStatus::EmAberto => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown payment status: '{}'. Use '{}', '{}' or '{}'.",
                    s, EM_ABERTO, PAGO_ATRASADO, PAGO_EM_DIA
                )
            })
    }
}

/// Classify one invoice from its settlement type and dates.
///
/// A missing settlement type is treated the same as the open sentinel.
/// Missing dates never compare as late.
pub fn classify_payment(
    tipo_baixa: Option<&str>,
    dt_pagamento: Option<NaiveDate>,
    dt_vencimento: Option<NaiveDate>,
) -> PaymentStatus {
    match tipo_baixa {
        None => PaymentStatus::EmAberto,
        Some(tipo) if tipo == EM_ABERTO => PaymentStatus::EmAberto,
        Some(_) => match (dt_pagamento, dt_vencimento) {
            (Some(pagamento), Some(vencimento)) if pagamento > vencimento => {
                PaymentStatus::PagoAtrasado
            }
            _ => PaymentStatus::PagoEmDia,
        },
    }
}

/// Days between due date and payment date, clamped at zero.
/// Returns 0 when either date is missing.
pub fn days_late(dt_pagamento: Option<NaiveDate>, dt_vencimento: Option<NaiveDate>) -> i64 {
    match (dt_pagamento, dt_vencimento) {
        (Some(pagamento), Some(vencimento)) => (pagamento - vencimento).num_days().max(0),
        _ => 0,
    }
}

/// Append `status_pagamento`, `dias_atraso` and `inadimplente` to the joined table.
///
/// Expects `dt_pagamento`/`dt_vencimento` to be `Date` columns, as produced by the loader.
pub fn derive_labels(df: &DataFrame) -> Result<DataFrame> {
    let tipo_baixa = df.column(TIPO_BAIXA)?.cast(&DataType::String)?;
    let tipo_baixa = tipo_baixa.str()?;
    let pagamento = date_values(df, DT_PAGAMENTO)?;
    let vencimento = date_values(df, DT_VENCIMENTO)?;

    let height = df.height();
    let mut statuses: Vec<&'static str> = Vec::with_capacity(height);
    let mut atraso: Vec<i64> = Vec::with_capacity(height);
    let mut inadimplente: Vec<i32> = Vec::with_capacity(height);

    for ((tipo, pago), vence) in tipo_baixa.iter().zip(pagamento).zip(vencimento) {
        let status = classify_payment(tipo, pago, vence);
        statuses.push(status.label());
        atraso.push(days_late(pago, vence));
        inadimplente.push(status.default_flag());
    }

    let mut labeled = df.clone();
    labeled.with_column(Column::new(STATUS_PAGAMENTO.into(), statuses))?;
    labeled.with_column(Column::new(DIAS_ATRASO.into(), atraso))?;
    labeled.with_column(Column::new(INADIMPLENTE.into(), inadimplente))?;

    Ok(labeled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_open_sentinel_is_em_aberto() {
        let status = classify_payment(Some(EM_ABERTO), None, ymd(2024, 1, 10));
        assert_eq!(status, PaymentStatus::EmAberto);
        assert_eq!(status.default_flag(), 1);
    }

    #[test]
    fn test_missing_settlement_type_is_em_aberto() {
        assert_eq!(
            classify_payment(None, ymd(2024, 1, 20), ymd(2024, 1, 10)),
            PaymentStatus::EmAberto
        );
    }

    #[test]
    fn test_paid_late_is_not_default() {
        let status = classify_payment(Some("Pago"), ymd(2024, 1, 15), ymd(2024, 1, 10));
        assert_eq!(status, PaymentStatus::PagoAtrasado);
        assert_eq!(status.default_flag(), 0);
    }

    #[test]
    fn test_paid_on_due_date_is_on_time() {
        assert_eq!(
            classify_payment(Some("Pago"), ymd(2024, 1, 10), ymd(2024, 1, 10)),
            PaymentStatus::PagoEmDia
        );
    }

    #[test]
    fn test_paid_without_payment_date_is_on_time() {
        assert_eq!(
            classify_payment(Some("Pago"), None, ymd(2024, 1, 10)),
            PaymentStatus::PagoEmDia
        );
    }

    #[test]
    fn test_days_late_clamps_and_handles_missing() {
        assert_eq!(days_late(ymd(2024, 1, 15), ymd(2024, 1, 10)), 5);
        assert_eq!(days_late(ymd(2024, 1, 5), ymd(2024, 1, 10)), 0);
        assert_eq!(days_late(None, ymd(2024, 1, 10)), 0);
        assert_eq!(days_late(ymd(2024, 1, 5), None), 0);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            "pago atrasado".parse::<PaymentStatus>().unwrap(),
            PaymentStatus::PagoAtrasado
        );
        assert!("Quitado".parse::<PaymentStatus>().is_err());
    }
}
