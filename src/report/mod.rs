//! Report module - statistics, tables and plots over the encoded dataset

pub mod cohort_export;
pub mod correlation_export;
pub mod multicollinearity;
pub mod plots;
pub mod summary;

pub use cohort_export::*;
pub use correlation_export::*;
pub use multicollinearity::*;
pub use plots::*;
pub use summary::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::analysis::{
    cohort_prevalence, column_as_f64, correlation_matrix, correlations_with_target,
    find_correlated_pairs, indicator_value_counts, prevalence_by_category, prevalence_pct,
    summarize_numeric, values_by_label, CohortStat, CorrelatedPair, FeatureSummary, Histogram,
    ValueCounts,
};
use crate::pipeline::{
    load_csv, CLEAN_DATASET_FILE, LABEL_COLUMN, NUMERIC_COLUMNS, SMOKING_HISTORY,
};
use crate::utils::{create_progress_bar, finish_with_success, finish_with_warning};

pub const CORRELATION_FILE: &str = "correlation.json";
pub const COHORT_FILE: &str = "risk_groups.csv";
pub const MULTICOLLINEARITY_FILE: &str = "multicollinearity.txt";
pub const SMOKING_PLOT_FILE: &str = "smoking_vs_diabetes.svg";
pub const HEATMAP_FILE: &str = "correlation_heatmap.svg";

/// Settings for one reporting run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Encoded dataset produced by the ETL
    pub input: PathBuf,
    /// Directory for the JSON, CSV and text artifacts
    pub output_dir: PathBuf,
    /// Directory for the SVG plots, created on demand
    pub plots_dir: PathBuf,
    pub histogram_bins: usize,
    /// Absolute correlation above which a pair is flagged
    pub multicollinearity_threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(CLEAN_DATASET_FILE),
            output_dir: PathBuf::from("."),
            plots_dir: PathBuf::from("out/plots"),
            histogram_bins: 50,
            multicollinearity_threshold: 0.8,
        }
    }
}

/// An artifact that could not be produced
#[derive(Debug, Clone)]
pub struct ArtifactFailure {
    pub artifact: String,
    pub error: String,
}

/// Everything one reporting run computed and wrote
#[derive(Debug, Clone, Default)]
pub struct ReportOutcome {
    pub rows: usize,
    pub written: Vec<PathBuf>,
    pub failures: Vec<ArtifactFailure>,
    pub summary: Vec<FeatureSummary>,
    pub indicator_counts: Vec<ValueCounts>,
    pub prevalence: Option<f64>,
    pub correlations: Vec<(String, f64)>,
    pub cohorts: Vec<CohortStat>,
    pub high_correlations: Vec<CorrelatedPair>,
}

impl ReportOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Record the result of one artifact and keep going.
    fn record<T>(&mut self, artifact: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(artifact, error = %format!("{:#}", e), "report artifact failed");
                self.failures.push(ArtifactFailure {
                    artifact: artifact.to_string(),
                    error: format!("{:#}", e),
                });
                None
            }
        }
    }

    fn record_write(&mut self, artifact: &str, path: PathBuf, result: Result<()>) {
        if self.record(artifact, result).is_some() {
            info!(path = %path.display(), "wrote report artifact");
            self.written.push(path);
        }
    }
}

/// Load the encoded dataset and produce every report artifact.
///
/// Only a load failure aborts the run. Each other artifact fails on its own
/// and is listed in [`ReportOutcome::failures`].
pub fn run_report(config: &ReportConfig) -> Result<ReportOutcome> {
    let df = load_csv(&config.input)
        .with_context(|| format!("Failed to load dataset: {}", config.input.display()))?;

    let mut outcome = ReportOutcome {
        rows: df.height(),
        ..Default::default()
    };

    let summary = summarize_numeric(&df, &NUMERIC_COLUMNS);
    if let Some(summary) = outcome.record("summary statistics", summary) {
        outcome.summary = summary;
    }

    let mut counts = Vec::new();
    for prefix in ["gender", SMOKING_HISTORY] {
        if let Some(c) = outcome.record("categorical counts", indicator_value_counts(&df, prefix)) {
            counts.extend(c);
        }
    }
    outcome.indicator_counts = counts;

    outcome.prevalence = outcome.record("prevalence", prevalence_pct(&df, LABEL_COLUMN));

    // correlation.json
    let correlations = outcome.record(
        "correlations",
        correlations_with_target(&df, &NUMERIC_COLUMNS, LABEL_COLUMN),
    );
    if let Some(correlations) = correlations {
        let path = config.output_dir.join(CORRELATION_FILE);
        let result = ensure_dir(&config.output_dir)
            .and_then(|_| export_correlations(&correlations, &path));
        outcome.record_write(CORRELATION_FILE, path, result);
        outcome.correlations = correlations;
    }

    // risk_groups.csv
    if let Some(cohorts) = outcome.record("cohorts", cohort_prevalence(&df, LABEL_COLUMN)) {
        let path = config.output_dir.join(COHORT_FILE);
        let result = ensure_dir(&config.output_dir)
            .and_then(|_| export_cohort_table(&cohorts, &path));
        outcome.record_write(COHORT_FILE, path, result);
        outcome.cohorts = cohorts;
    }

    write_plots(&df, config, &mut outcome);

    // multicollinearity.txt
    let pairs = correlation_matrix(&df, &NUMERIC_COLUMNS)
        .map(|m| find_correlated_pairs(&m, config.multicollinearity_threshold));
    if let Some(pairs) = outcome.record("multicollinearity", pairs) {
        let path = config.output_dir.join(MULTICOLLINEARITY_FILE);
        let result = ensure_dir(&config.output_dir).and_then(|_| {
            export_multicollinearity_report(&pairs, config.multicollinearity_threshold, &path)
        });
        outcome.record_write(MULTICOLLINEARITY_FILE, path, result);
        outcome.high_correlations = pairs;
    }

    Ok(outcome)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))
}

fn write_plots(
    df: &polars::prelude::DataFrame,
    config: &ReportConfig,
    outcome: &mut ReportOutcome,
) {
    let plots_dir = &config.plots_dir;
    if outcome.record("plots directory", ensure_dir(plots_dir)).is_none() {
        return;
    }

    let total = NUMERIC_COLUMNS.len() * 2 + 2;
    let pb = create_progress_bar(total as u64, "Rendering plots");
    let failures_before = outcome.failures.len();

    for column in NUMERIC_COLUMNS {
        let file = format!("hist_{}.svg", column);
        let path = plots_dir.join(&file);
        let result = column_as_f64(df, column).and_then(|values| {
            let values: Vec<f64> = values.into_iter().flatten().collect();
            let hist = Histogram::build(&values, config.histogram_bins)
                .with_context(|| format!("Column '{}' has no values to bin", column))?;
            plot_histogram(&path, column, &hist)
        });
        outcome.record_write(&file, path, result);
        pb.inc(1);

        let file = format!("box_{}_by_diabetes.svg", column);
        let path = plots_dir.join(&file);
        let result = values_by_label(df, column, LABEL_COLUMN)
            .and_then(|groups| plot_boxplot(&path, column, LABEL_COLUMN, &groups));
        outcome.record_write(&file, path, result);
        pb.inc(1);
    }

    let path = plots_dir.join(SMOKING_PLOT_FILE);
    let result = prevalence_by_category(df, SMOKING_HISTORY, LABEL_COLUMN).and_then(|prevalence| {
        plot_category_prevalence(&path, "Diabetes Prevalence by Smoking History", &prevalence)
    });
    outcome.record_write(SMOKING_PLOT_FILE, path, result);
    pb.inc(1);

    let mut heatmap_columns = NUMERIC_COLUMNS.to_vec();
    heatmap_columns.push(LABEL_COLUMN);
    let path = plots_dir.join(HEATMAP_FILE);
    let result = correlation_matrix(df, &heatmap_columns)
        .and_then(|matrix| plot_correlation_heatmap(&path, &matrix));
    outcome.record_write(HEATMAP_FILE, path, result);
    pb.inc(1);

    if outcome.failures.len() > failures_before {
        finish_with_warning(&pb, "Some plots could not be rendered");
    } else {
        finish_with_success(&pb, "Plots rendered");
    }
}
