//! End-to-end tests running the boleto-eda binary

use assert_cmd::Command;
use predicates::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn boleto_eda() -> Command {
    Command::cargo_bin("boleto-eda").unwrap()
}

#[test]
fn test_full_run_prints_sections_and_writes_report() {
    let (dir, boletos, auxiliar) = create_fixture_files();
    let report = dir.path().join("report.json");

    boleto_eda()
        .arg("-b")
        .arg(&boletos)
        .arg("-a")
        .arg(&auxiliar)
        .arg("-r")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("PAYMENT STATUS"))
        .stdout(predicate::str::contains("Pago Atrasado"))
        .stdout(predicate::str::contains("PAYER CORRELATIONS"))
        .stdout(predicate::str::contains(
            "Ranked by correlation with taxa_inadimplencia",
        ))
        .stdout(predicate::str::contains("Analysis complete"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["report"]["overview"]["total_invoices"], 7);
    assert!(json["report"]["correlations"]["risk"]["anchored"].is_array());
}

#[test]
fn test_missing_input_fails_without_report() {
    let dir = tempfile::TempDir::new().unwrap();
    let auxiliar = write_text(dir.path(), "auxiliar.csv", AUXILIAR_CSV);
    let report = dir.path().join("report.json");

    boleto_eda()
        .arg("-b")
        .arg(dir.path().join("missing.csv"))
        .arg("-a")
        .arg(&auxiliar)
        .arg("-r")
        .arg(&report)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.csv"));

    assert!(!report.exists());
}

#[test]
fn test_export_subcommand_writes_filtered_csv() {
    let (dir, boletos, auxiliar) = create_fixture_files();
    let output = dir.path().join("abertos.csv");

    boleto_eda()
        .arg("export")
        .arg("-b")
        .arg(&boletos)
        .arg("-a")
        .arg(&auxiliar)
        .arg("-o")
        .arg(&output)
        .arg("--status")
        .arg("Em Aberto")
        .assert()
        .success()
        .stdout(predicate::str::contains("Export complete"));

    let contents = std::fs::read_to_string(&output).unwrap();
    // header plus the two open invoices
    assert_eq!(contents.lines().count(), 3);
    assert!(contents.lines().skip(1).all(|line| line.contains("Em Aberto")));
}
