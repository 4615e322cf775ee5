//! The cleaning pipeline: validate → partition → encode → scale → split

use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{info, warn};

use super::cleaning::{partition_records, CleaningOutcome};
use super::encoding::{one_hot_encode, CategoryEncoding};
use super::error::EtlError;
use super::loader::load_csv;
use super::publish::{publish_artifacts, Artifact};
use super::scaling::{standardize, ColumnScaling};
use super::schema::{
    records_from_frame, records_to_frame, validate_schema, LABEL_COLUMN, NUMERIC_COLUMNS,
};
use super::split::stratified_split;

pub const CLEAN_DATASET_FILE: &str = "clean_diabetes.csv";
pub const TRAIN_FILE: &str = "train.csv";
pub const TEST_FILE: &str = "test.csv";
pub const QUARANTINE_FILE: &str = "quarantine.csv";

/// Default raw input file name
pub const DEFAULT_RAW_INPUT: &str = "diabetes_prediction_dataset.csv";

/// Settings for one ETL run
#[derive(Debug, Clone, PartialEq)]
pub struct EtlConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Share of rows placed in the test partition
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_RAW_INPUT),
            output_dir: PathBuf::from("."),
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Everything the pipeline produced, held in memory until publication
#[derive(Debug, Clone)]
pub struct EtlOutput {
    pub cleaning: CleaningOutcome,
    pub quarantine: DataFrame,
    pub encoded: DataFrame,
    pub encodings: Vec<CategoryEncoding>,
    pub scaling: Vec<ColumnScaling>,
    pub train: DataFrame,
    pub test: DataFrame,
}

/// Run every transformation on an already-loaded raw frame. Writes nothing.
pub fn run_cleaning_pipeline(raw: DataFrame, config: &EtlConfig) -> Result<EtlOutput, EtlError> {
    validate_schema(&raw)?;
    let records = records_from_frame(&raw)?;
    drop(raw);

    let cleaning = partition_records(records);
    let quarantine = records_to_frame(&cleaning.quarantine_records())?;

    if cleaning.dropped_incomplete > 0 {
        // Null rows are not written to quarantine; only the count survives.
        warn!(
            dropped = cleaning.dropped_incomplete,
            "dropped rows with null values without quarantining them"
        );
    }

    if cleaning.accepted.is_empty() {
        return Err(EtlError::EmptyDataset {
            input_rows: cleaning.deduplicated_rows(),
            quarantined: cleaning.quarantined.len(),
            dropped: cleaning.dropped_incomplete,
        });
    }

    let encoded = one_hot_encode(&cleaning.accepted)?;
    for encoding in &encoded.encodings {
        info!(
            column = %encoding.column,
            reference = %encoding.reference,
            indicators = encoding.levels.len(),
            "encoded categorical column"
        );
    }

    // Scaling is fit on the full dataset before splitting, so test rows
    // contribute to the fitted mean and std.
    let (scaled, scaling) = standardize(encoded.df, &NUMERIC_COLUMNS)?;
    for params in &scaling {
        info!(column = %params.column, mean = params.mean, std = params.std, "standardized column");
    }

    let split = stratified_split(&scaled, LABEL_COLUMN, config.test_fraction, config.seed)?;

    Ok(EtlOutput {
        cleaning,
        quarantine,
        encoded: scaled,
        encodings: encoded.encodings,
        scaling,
        train: split.train,
        test: split.test,
    })
}

/// Write the four ETL artifacts. Either all are published or none.
pub fn publish_output(output: &EtlOutput, output_dir: &Path) -> Result<Vec<PathBuf>, EtlError> {
    let mut artifacts = [
        Artifact::new(CLEAN_DATASET_FILE, output.encoded.clone()),
        Artifact::new(TRAIN_FILE, output.train.clone()),
        Artifact::new(TEST_FILE, output.test.clone()),
        Artifact::new(QUARANTINE_FILE, output.quarantine.clone()),
    ];
    publish_artifacts(output_dir, &mut artifacts)
}

/// Load, transform and publish.
pub fn run_etl(config: &EtlConfig) -> Result<EtlOutput, EtlError> {
    let raw = load_csv(&config.input)?;
    let output = run_cleaning_pipeline(raw, config)?;
    publish_output(&output, &config.output_dir)?;
    Ok(output)
}
