//! Binary-level tests: argument handling, output formats, exit codes

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn catq() -> Command {
    Command::cargo_bin("catq").unwrap()
}

fn healthy_csv() -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    writeln!(file, "product_id,description,code_1").unwrap();
    for i in 0..80 {
        writeln!(
            file,
            "P{i},Stainless steel hinge assembly variant {i},HNG{}",
            i % 4
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn analyze_succeeds_with_console_output() {
    let file = healthy_csv();
    catq()
        .arg(file.path())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog Quality Analysis"))
        .stdout(predicate::str::contains("Score Breakdown"));
}

#[test]
fn json_output_parses() {
    let file = healthy_csv();
    let output = catq().arg(file.path()).arg("--json").output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(parsed["overall_score"].is_number());
    assert!(parsed["label"].is_string());
    assert!(parsed["completeness"]["sub_score"].is_number());
    assert_eq!(parsed["dataset"]["total_rows"], 80);
}

#[test]
fn explicit_columns_override_detection() {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    writeln!(file, "sku,text,category").unwrap();
    for i in 0..30 {
        writeln!(file, "S{i},Anodized aluminium rail section {i},CAT{}", i % 3).unwrap();
    }
    file.flush().unwrap();

    let output = catq()
        .arg(file.path())
        .arg("--id-column")
        .arg("sku")
        .arg("--description-column")
        .arg("text")
        .arg("--code-columns")
        .arg("category")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["dataset"]["id_column"], "sku");
    assert_eq!(parsed["dataset"]["description_column"], "text");
}

#[test]
fn threshold_failure_exits_one() {
    let file = healthy_csv();
    catq()
        .arg(file.path())
        .arg("--threshold")
        .arg("99.9")
        .arg("--no-color")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("below the threshold"));
}

#[test]
fn threshold_pass_exits_zero() {
    let file = healthy_csv();
    catq()
        .arg(file.path())
        .arg("--threshold")
        .arg("1.0")
        .assert()
        .success();
}

#[test]
fn missing_file_exits_two() {
    catq()
        .arg("/nonexistent/catalog.csv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn unknown_column_exits_two() {
    let file = healthy_csv();
    catq()
        .arg(file.path())
        .arg("--description-column")
        .arg("no_such_column")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no_such_column"));
}

#[test]
fn quiet_mode_prints_score_and_label_only() {
    let file = healthy_csv();
    let output = catq()
        .arg(file.path())
        .arg("--quiet")
        .arg("--no-color")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains('('));
}

#[test]
fn csv_export_writes_metric_rows() {
    let file = healthy_csv();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report.csv");

    catq()
        .arg(file.path())
        .arg("--csv")
        .arg(&out)
        .assert()
        .success();

    let table = std::fs::read_to_string(&out).unwrap();
    assert!(table.starts_with("metric_name,sub_score,key_statistics"));
    assert!(table.contains("classifier_readiness,"));
    assert!(table.contains("overall,"));
}

#[test]
fn json_output_file_is_written() {
    let file = healthy_csv();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report.json");

    catq()
        .arg(file.path())
        .arg("--json")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert!(parsed["overall_score"].is_number());
}

#[test]
fn init_creates_config_file() {
    let dir = TempDir::new().unwrap();
    catq()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(".catqrc.json"));

    let config = std::fs::read_to_string(dir.path().join(".catqrc.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&config).unwrap();
    assert!(parsed["weights"]["completeness"].is_number());
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".catqrc.json"), "{}").unwrap();
    catq()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_file_threshold_is_honored() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".catqrc.json"), r#"{"threshold": 99.9}"#).unwrap();

    let csv_path = dir.path().join("catalog.csv");
    let mut content = String::from("product_id,description,code_1\n");
    for i in 0..40 {
        content.push_str(&format!(
            "P{i},Powder coated bracket model {i},BRK{}\n",
            i % 2
        ));
    }
    std::fs::write(&csv_path, content).unwrap();

    catq().arg(&csv_path).arg("--no-color").assert().code(1);
}

#[test]
fn cli_threshold_overrides_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".catqrc.json"), r#"{"threshold": 99.9}"#).unwrap();

    let csv_path = dir.path().join("catalog.csv");
    let mut content = String::from("product_id,description,code_1\n");
    for i in 0..40 {
        content.push_str(&format!(
            "P{i},Powder coated bracket model {i},BRK{}\n",
            i % 2
        ));
    }
    std::fs::write(&csv_path, content).unwrap();

    catq()
        .arg(&csv_path)
        .arg("--threshold")
        .arg("1.0")
        .assert()
        .success();
}

#[test]
fn no_arguments_shows_usage_error() {
    catq()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage").or(predicate::str::contains("usage")));
}
