// Command-line behavior of the fcmean and pvalue binaries.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_inputs(dir: &Path) {
    fs::write(
        dir.join("matrix.csv"),
        "gene,a,b,c,d,e,f\nMYC,1,2,3,10,11,12\nFLAT,4,4,4,4,4,4\nACTB,5,9,7,6,8,10\n",
    )
    .unwrap();
    fs::write(dir.join("labels.csv"), "label\n1\n1\n1\n2\n2\n2\n").unwrap();
}

#[test]
fn test_fcmean_writes_default_output() {
    let tmp_dir = TempDir::new().unwrap();
    write_inputs(tmp_dir.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fcmean");
    cmd.current_dir(tmp_dir.path())
        .arg("matrix.csv")
        .arg("labels.csv")
        .arg("2");
    cmd.assert().success();

    let output = fs::read_to_string(tmp_dir.path().join("fcmean.csv")).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "targetid,mean_value");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("MYC,"));
    assert_eq!(lines[3], "FLAT,0");
}

#[test]
fn test_pvalue_writes_default_output() {
    let tmp_dir = TempDir::new().unwrap();
    write_inputs(tmp_dir.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pvalue");
    cmd.current_dir(tmp_dir.path())
        .arg("matrix.csv")
        .arg("labels.csv")
        .arg("2");
    cmd.assert().success();

    let output = fs::read_to_string(tmp_dir.path().join("pvalue.csv")).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "targetid,min_value");
    assert_eq!(lines[1], "MYC,0.1");
    // All-tied feature has no p-value and sorts last
    assert_eq!(lines[3], "FLAT,");
}

#[test]
fn test_pvalue_custom_output_and_pairwise() {
    let tmp_dir = TempDir::new().unwrap();
    write_inputs(tmp_dir.path());
    let out = tmp_dir.path().join("ranked.csv");
    let pairwise = tmp_dir.path().join("pairs.csv");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pvalue");
    cmd.arg(tmp_dir.path().join("matrix.csv"))
        .arg(tmp_dir.path().join("labels.csv"))
        .arg("2")
        .arg("--output")
        .arg(&out)
        .arg("--pairwise")
        .arg(&pairwise);
    cmd.assert().success();

    assert!(out.exists());
    let table = fs::read_to_string(&pairwise).unwrap();
    assert!(table.starts_with("targetid,1_vs_2\nMYC,0.1\n"));
}

#[test]
fn test_pvalue_fail_policy_aborts() {
    let tmp_dir = TempDir::new().unwrap();
    write_inputs(tmp_dir.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pvalue");
    cmd.current_dir(tmp_dir.path())
        .arg("matrix.csv")
        .arg("labels.csv")
        .arg("2")
        .arg("--on-degenerate")
        .arg("fail");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Degenerate Mann-Whitney test for feature 'FLAT'"));

    assert!(!tmp_dir.path().join("pvalue.csv").exists());
}

#[test]
fn test_missing_class_reports_error() {
    let tmp_dir = TempDir::new().unwrap();
    write_inputs(tmp_dir.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fcmean");
    cmd.current_dir(tmp_dir.path())
        .arg("matrix.csv")
        .arg("labels.csv")
        .arg("3");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Class 3 of 1..=3 has no samples"));
}

#[test]
fn test_non_numeric_cell_reports_format_error() {
    let tmp_dir = TempDir::new().unwrap();
    write_inputs(tmp_dir.path());
    fs::write(tmp_dir.path().join("matrix.csv"), "gene,a,b\nMYC,1,x\n").unwrap();
    fs::write(tmp_dir.path().join("labels.csv"), "label\n1\n2\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pvalue");
    cmd.current_dir(tmp_dir.path())
        .arg("matrix.csv")
        .arg("labels.csv")
        .arg("2");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("non-numeric value 'x'"));
}

#[test]
fn test_missing_arguments_rejected() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fcmean");
    cmd.arg("matrix.csv");
    cmd.assert().failure();
}
