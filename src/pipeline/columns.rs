//! Column names shared by the loader, the analyses and the exports.
//!
//! Input files are matched by these exact names, and every derived table
//! exposes its results under the names below.

// Invoice (boletos) table
pub const ID_PAGADOR: &str = "id_pagador";
pub const DT_EMISSAO: &str = "dt_emissao";
pub const DT_VENCIMENTO: &str = "dt_vencimento";
pub const DT_PAGAMENTO: &str = "dt_pagamento";
pub const TIPO_BAIXA: &str = "tipo_baixa";
pub const VLR_BAIXA: &str = "vlr_baixa";
pub const VLR_NOMINAL: &str = "vlr_nominal";
pub const TIPO_ESPECIE: &str = "tipo_especie";
pub const CD_CNAE_PRIN: &str = "cd_cnae_prin";

// Auxiliary (payer) table
pub const ID_CNPJ: &str = "id_cnpj";
pub const SCORE_MATERIALIDADE_V2: &str = "score_materialidade_v2";
pub const SCORE_QUANTIDADE_V2: &str = "score_quantidade_v2";
pub const MEDIA_ATRASO_DIAS: &str = "media_atraso_dias";
pub const SHARE_VL_INAD_6_A_15D: &str = "share_vl_inad_pag_bol_6_a_15d";
pub const LIQUIDEZ_QUANTITATIVO_3M: &str = "indicador_liquidez_quantitativo_3m";
pub const SCORE_MATERIALIDADE_EVOLUCAO: &str = "score_materialidade_evolucao";
pub const SACADO_LIQUIDEZ_1M: &str = "sacado_indice_liquidez_1m";
pub const CEDENTE_LIQUIDEZ_1M: &str = "cedente_indice_liquidez_1m";

// Derived invoice labels
pub const STATUS_PAGAMENTO: &str = "status_pagamento";
pub const DIAS_ATRASO: &str = "dias_atraso";
pub const INADIMPLENTE: &str = "inadimplente";

// Payer summary
pub const QTD_BOLETOS: &str = "qtd_boletos";
pub const TAXA_INADIMPLENCIA: &str = "taxa_inadimplencia";
pub const SCORE_MATERIALIDADE: &str = "score_materialidade";
pub const SCORE_QUANTIDADE: &str = "score_quantidade";
pub const MEDIA_ATRASO_DIAS_AUX: &str = "media_atraso_dias_aux";
pub const ALTO_RISCO: &str = "alto_risco";

/// Settlement type written into missing `tipo_baixa` cells; also the open-invoice status.
pub const EM_ABERTO: &str = "Em Aberto";
pub const PAGO_ATRASADO: &str = "Pago Atrasado";
pub const PAGO_EM_DIA: &str = "Pago em Dia";

pub const RISCO_ALTO: &str = "Alto Risco";
pub const RISCO_BAIXO: &str = "Baixo Risco";

/// Date columns parsed on load
pub const DATE_COLUMNS: [&str; 3] = [DT_EMISSAO, DT_VENCIMENTO, DT_PAGAMENTO];

/// Invoice columns the pipeline cannot run without
pub const REQUIRED_INVOICE_COLUMNS: [&str; 5] = [
    ID_PAGADOR,
    DT_VENCIMENTO,
    DT_PAGAMENTO,
    TIPO_BAIXA,
    VLR_NOMINAL,
];

/// Numeric score columns expected in the auxiliary table
pub const AUX_SCORE_COLUMNS: [&str; 8] = [
    SCORE_MATERIALIDADE_V2,
    SCORE_QUANTIDADE_V2,
    MEDIA_ATRASO_DIAS,
    SHARE_VL_INAD_6_A_15D,
    LIQUIDEZ_QUANTITATIVO_3M,
    SCORE_MATERIALIDADE_EVOLUCAO,
    SACADO_LIQUIDEZ_1M,
    CEDENTE_LIQUIDEZ_1M,
];

/// (source column in the joined table, output column in the payer summary)
pub const PAYER_MEAN_COLUMNS: [(&str, &str); 8] = [
    (SCORE_MATERIALIDADE_V2, SCORE_MATERIALIDADE),
    (SCORE_QUANTIDADE_V2, SCORE_QUANTIDADE),
    (MEDIA_ATRASO_DIAS, MEDIA_ATRASO_DIAS_AUX),
    (SHARE_VL_INAD_6_A_15D, SHARE_VL_INAD_6_A_15D),
    (LIQUIDEZ_QUANTITATIVO_3M, LIQUIDEZ_QUANTITATIVO_3M),
    (SCORE_MATERIALIDADE_EVOLUCAO, SCORE_MATERIALIDADE_EVOLUCAO),
    (SACADO_LIQUIDEZ_1M, SACADO_LIQUIDEZ_1M),
    (CEDENTE_LIQUIDEZ_1M, CEDENTE_LIQUIDEZ_1M),
];

/// Correlation set from the initial exploratory pass
pub const EDA_CORRELATION_COLUMNS: [&str; 4] = [
    TAXA_INADIMPLENCIA,
    SCORE_MATERIALIDADE,
    SCORE_QUANTIDADE,
    MEDIA_ATRASO_DIAS_AUX,
];

/// Additional risk indicators, anchored on the default rate
pub const RISK_CORRELATION_COLUMNS: [&str; 4] = [
    TAXA_INADIMPLENCIA,
    SHARE_VL_INAD_6_A_15D,
    LIQUIDEZ_QUANTITATIVO_3M,
    SCORE_MATERIALIDADE_EVOLUCAO,
];

/// One-month liquidity indicators, anchored on the default rate
pub const LIQUIDITY_CORRELATION_COLUMNS: [&str; 3] = [
    TAXA_INADIMPLENCIA,
    SACADO_LIQUIDEZ_1M,
    CEDENTE_LIQUIDEZ_1M,
];

/// Indicators profiled per risk group
pub const PROFILE_COLUMNS: [&str; 5] = [
    SHARE_VL_INAD_6_A_15D,
    LIQUIDEZ_QUANTITATIVO_3M,
    SCORE_MATERIALIDADE_EVOLUCAO,
    SACADO_LIQUIDEZ_1M,
    CEDENTE_LIQUIDEZ_1M,
];
