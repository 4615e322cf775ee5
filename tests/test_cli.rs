//! Tests for CLI argument parsing and the binary

#[path = "common/mod.rs"]
mod common;

use std::path::PathBuf;

use assert_cmd::Command;
use clap::Parser;
use common::{create_raw_fixture, list_files};
use diabrisk::cli::{Cli, Task};
use diabrisk::pipeline::EtlConfig;
use diabrisk::report::ReportConfig;
use predicates::prelude::*;

#[test]
fn test_etl_defaults_match_config_defaults() {
    let cli = Cli::parse_from(["diabrisk", "etl"]);

    assert!(!cli.verbose);
    assert_eq!(cli.command.task(), Task::Etl(EtlConfig::default()));
}

#[test]
fn test_analyze_defaults_match_config_defaults() {
    let cli = Cli::parse_from(["diabrisk", "analyze"]);

    assert_eq!(cli.command.task(), Task::Report(ReportConfig::default()));
}

#[test]
fn test_etl_custom_values() {
    let cli = Cli::parse_from([
        "diabrisk",
        "etl",
        "raw.csv",
        "-o",
        "out",
        "--test-fraction",
        "0.3",
        "--seed",
        "7",
        "-v",
    ]);

    assert!(cli.verbose);
    assert_eq!(
        cli.command.task(),
        Task::Etl(EtlConfig {
            input: PathBuf::from("raw.csv"),
            output_dir: PathBuf::from("out"),
            test_fraction: 0.3,
            seed: 7,
        })
    );
}

#[test]
fn test_analyze_custom_values() {
    let cli = Cli::parse_from([
        "diabrisk",
        "analyze",
        "clean.csv",
        "--plots-dir",
        "figs",
        "--bins",
        "20",
        "--correlation-threshold",
        "0.9",
    ]);

    match cli.command.task() {
        Task::Report(config) => {
            assert_eq!(config.input, PathBuf::from("clean.csv"));
            assert_eq!(config.plots_dir, PathBuf::from("figs"));
            assert_eq!(config.histogram_bins, 20);
            assert_eq!(config.multicollinearity_threshold, 0.9);
        }
        other => panic!("Expected report task, got {:?}", other),
    }
}

#[test]
fn test_invalid_values_rejected() {
    assert!(Cli::try_parse_from(["diabrisk", "etl", "--test-fraction", "1.5"]).is_err());
    assert!(Cli::try_parse_from(["diabrisk", "etl", "--test-fraction", "0"]).is_err());
    assert!(Cli::try_parse_from(["diabrisk", "analyze", "--correlation-threshold", "2"]).is_err());
    assert!(Cli::try_parse_from(["diabrisk", "analyze", "--bins", "0"]).is_err());
    assert!(Cli::try_parse_from(["diabrisk"]).is_err());
}

#[test]
fn test_binary_etl_then_analyze() {
    let (dir, raw) = create_raw_fixture(60);
    let out = dir.path().join("out");

    Command::cargo_bin("diabrisk")
        .unwrap()
        .arg("etl")
        .arg(&raw)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("ETL complete!"));

    assert_eq!(
        list_files(&out),
        vec!["clean_diabetes.csv", "quarantine.csv", "test.csv", "train.csv"]
    );

    Command::cargo_bin("diabrisk")
        .unwrap()
        .arg("analyze")
        .arg(out.join("clean_diabetes.csv"))
        .arg("-o")
        .arg(&out)
        .arg("--plots-dir")
        .arg(dir.path().join("plots"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Report complete!"));

    assert!(out.join("correlation.json").exists());
    assert!(out.join("risk_groups.csv").exists());
    assert!(out.join("multicollinearity.txt").exists());
}

#[test]
fn test_binary_reports_schema_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let raw = dir.path().join("raw.csv");
    std::fs::write(&raw, "gender,age\nFemale,40\n").unwrap();

    Command::cargo_bin("diabrisk")
        .unwrap()
        .arg("etl")
        .arg(&raw)
        .arg("-o")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Schema mismatch"));
}
