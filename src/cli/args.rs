//! Command-line argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::pipeline::{EtlConfig, CLEAN_DATASET_FILE, DEFAULT_RAW_INPUT};
use crate::report::ReportConfig;

/// diabrisk - Clean, encode and split the diabetes dataset, then report on it
#[derive(Parser, Debug)]
#[command(name = "diabrisk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate, deduplicate, quarantine, encode, scale and split the raw dataset
    Etl {
        /// Raw input CSV
        #[arg(default_value = DEFAULT_RAW_INPUT)]
        input: PathBuf,

        /// Directory for clean_diabetes.csv, train.csv, test.csv and quarantine.csv
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Share of rows placed in the test partition, strictly between 0 and 1
        #[arg(long, default_value = "0.2", value_parser = validate_test_fraction)]
        test_fraction: f64,

        /// Seed for the stratified shuffle
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Summary statistics, correlations, risk groups and plots over the encoded dataset
    Analyze {
        /// Encoded dataset produced by `etl`
        #[arg(default_value = CLEAN_DATASET_FILE)]
        input: PathBuf,

        /// Directory for correlation.json, risk_groups.csv and multicollinearity.txt
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Directory for the SVG plots (created if missing)
        #[arg(long, default_value = "out/plots")]
        plots_dir: PathBuf,

        /// Number of equal-width histogram bins
        #[arg(long, default_value = "50", value_parser = clap::value_parser!(u16).range(1..))]
        bins: u16,

        /// Absolute correlation above which a feature pair is flagged
        #[arg(long, default_value = "0.8", value_parser = validate_threshold)]
        correlation_threshold: f64,
    },
}

/// A parsed subcommand with its settings resolved
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Etl(EtlConfig),
    Report(ReportConfig),
}

impl Commands {
    pub fn task(&self) -> Task {
        match self {
            Commands::Etl {
                input,
                output_dir,
                test_fraction,
                seed,
            } => Task::Etl(EtlConfig {
                input: input.clone(),
                output_dir: output_dir.clone(),
                test_fraction: *test_fraction,
                seed: *seed,
            }),
            Commands::Analyze {
                input,
                output_dir,
                plots_dir,
                bins,
                correlation_threshold,
            } => Task::Report(ReportConfig {
                input: input.clone(),
                output_dir: output_dir.clone(),
                plots_dir: plots_dir.clone(),
                histogram_bins: usize::from(*bins),
                multicollinearity_threshold: *correlation_threshold,
            }),
        }
    }
}

fn parse_f64(s: &str) -> Result<f64, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not a valid number", s))
}

/// Validator for test_fraction: open interval (0, 1)
fn validate_test_fraction(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "test_fraction must be strictly between 0.0 and 1.0, got {}",
            value
        ))
    }
}

/// Validator for correlation_threshold: closed interval [0, 1]
fn validate_threshold(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "correlation_threshold must be between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
