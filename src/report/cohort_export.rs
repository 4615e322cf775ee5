//! Cohort table export to CSV

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::analysis::CohortStat;

/// Build the `Cohort, Condition, N, Diabetes %` frame.
pub fn cohort_frame(stats: &[CohortStat]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Column::new(
            "Cohort".into(),
            stats.iter().map(|s| s.cohort.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "Condition".into(),
            stats.iter().map(|s| s.condition.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "N".into(),
            stats.iter().map(|s| s.n as i64).collect::<Vec<i64>>(),
        ),
        Column::new(
            "Diabetes %".into(),
            stats.iter().map(|s| s.diabetes_pct).collect::<Vec<f64>>(),
        ),
    ])?;
    Ok(df)
}

/// Write the cohort table, one row per cohort.
pub fn export_cohort_table(stats: &[CohortStat], output_path: &Path) -> Result<()> {
    let mut df = cohort_frame(stats)?;
    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV file: {}", output_path.display()))?;
    Ok(())
}
