//! Descriptive statistics for the numeric columns

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::frame::{column_as_f64, round_to};
use super::missing::analyze_missing_values;

/// One row of the summary table. Statistics are `None` when undefined
/// (no values, or fewer than two for the standard deviation).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSummary {
    pub feature: String,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
    pub pct_missing: f64,
}

pub fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Sample standard deviation (divided by n - 1)
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|x| (x - mean) * (x - mean)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Mean, std, min, median, max (2 decimals) and % missing for each column.
pub fn summarize_numeric(df: &DataFrame, columns: &[&str]) -> Result<Vec<FeatureSummary>> {
    let missing = analyze_missing_values(df, columns)?;
    let mut summaries = Vec::with_capacity(columns.len());

    for (&name, (_, missing_ratio)) in columns.iter().zip(missing) {
        let mut values: Vec<f64> = column_as_f64(df, name)?.into_iter().flatten().collect();
        values.sort_by(f64::total_cmp);

        let mean = if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        };

        let round2 = |v: Option<f64>| v.map(|x| round_to(x, 2));
        summaries.push(FeatureSummary {
            feature: name.to_string(),
            mean: round2(mean),
            std: round2(sample_std(&values)),
            min: round2(values.first().copied()),
            median: round2(median(&values)),
            max: round2(values.last().copied()),
            pct_missing: round_to(missing_ratio * 100.0, 2),
        });
    }

    Ok(summaries)
}
