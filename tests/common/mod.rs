//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use boleto_eda::pipeline::columns::*;

/// Seven invoices over five payers.
///
/// - payer 1: paid on time + open               -> rate 0.5, Alto Risco
/// - payer 2: paid late (10 days) + paid on due  -> rate 0.0, Baixo Risco
/// - payer 3: missing `tipo_baixa` (open)        -> rate 1.0, Alto Risco
/// - payer 4: paid early, no CNAE                -> rate 0.0, Baixo Risco
/// - payer 5: paid late (18 days), no aux record -> rate 0.0, Baixo Risco
pub const BOLETOS_CSV: &str = "\
id_pagador,dt_emissao,dt_vencimento,dt_pagamento,tipo_baixa,vlr_baixa,vlr_nominal,tipo_especie,cd_cnae_prin
1,2024-01-02,2024-01-10,2024-01-09,Pago,100.0,100.0,DM,4711302
1,2024-01-05,2024-01-15,,Em Aberto,0.0,200.0,DM,4711302
2,2024-02-01,2024-02-10,2024-02-20,Pago,300.0,300.0,NP,6201501
2,2024-02-03,2024-02-12,2024-02-12,Pago,50.0,50.0,NP,6201501
3,2024-02-10,2024-02-20,,,0.0,5000.0,DM,4711302
4,2024-03-01,2024-03-10,2024-03-08,Pago,80.0,80.0,DS,
5,2024-03-02,2024-03-12,2024-03-30,Pago,90.0,90.0,DM,4711302
";

pub const AUXILIAR_CSV: &str = "\
id_cnpj,score_materialidade_v2,score_quantidade_v2,media_atraso_dias,share_vl_inad_pag_bol_6_a_15d,indicador_liquidez_quantitativo_3m,score_materialidade_evolucao,sacado_indice_liquidez_1m,cedente_indice_liquidez_1m
1,0.8,0.7,5.0,0.1,0.9,0.2,0.3,0.6
2,0.5,0.4,2.0,0.0,0.8,0.1,0.9,0.7
3,0.2,0.1,30.0,0.5,0.2,-0.3,0.1,0.2
4,0.9,0.9,0.0,0.0,1.0,0.4,0.4,0.8
";

/// Expected `status_pagamento` for each row of [`BOLETOS_CSV`]
pub const EXPECTED_STATUSES: [&str; 7] = [
    PAGO_EM_DIA,
    EM_ABERTO,
    PAGO_ATRASADO,
    PAGO_EM_DIA,
    EM_ABERTO,
    PAGO_EM_DIA,
    PAGO_ATRASADO,
];

/// Expected `dias_atraso` for each row of [`BOLETOS_CSV`]
pub const EXPECTED_DAYS_LATE: [i64; 7] = [0, 0, 10, 0, 0, 0, 18];

/// Write `contents` to `name` inside `dir`
pub fn write_text(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Temporary directory holding the boletos and auxiliar fixture CSVs
pub fn create_fixture_files() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let boletos = write_text(temp_dir.path(), "boletos.csv", BOLETOS_CSV);
    let auxiliar = write_text(temp_dir.path(), "auxiliar.csv", AUXILIAR_CSV);
    (temp_dir, boletos, auxiliar)
}

/// Write a DataFrame as CSV into a fresh temporary directory
pub fn create_temp_csv(df: &mut DataFrame, name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join(name);

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Write a DataFrame as Parquet into `dir`
pub fn write_parquet(dir: &Path, name: &str, df: &mut DataFrame) -> PathBuf {
    let parquet_path = dir.join(name);
    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();
    parquet_path
}

/// Labeled invoice frame for the analyses: `n_a` invoices in CNAE category
/// 4711 (every other one open) and `n_b` in 6201 (all paid).
pub fn create_cnae_frame(n_a: usize, n_b: usize) -> DataFrame {
    let mut cnae: Vec<&str> = vec!["4711302"; n_a];
    cnae.extend(vec!["6201501"; n_b]);
    let mut flags: Vec<i32> = (0..n_a).map(|i| (i % 2) as i32).collect();
    flags.extend(vec![0; n_b]);

    DataFrame::new(vec![
        Column::new(CD_CNAE_PRIN.into(), cnae),
        Column::new(INADIMPLENTE.into(), flags),
    ])
    .unwrap()
}

/// Text values of a column, nulls as `None`
pub fn string_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect()
}

/// Float values of a column, nulls as `None`
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
