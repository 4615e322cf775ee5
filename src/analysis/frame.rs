//! Column access helpers for the encoded dataset

use anyhow::{Context, Result};
use polars::prelude::*;

/// Read a column as nullable floats, casting integer columns.
pub fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found in dataset", name))?;
    let float_col = column
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' must be numeric (cannot cast to Float64)", name))?;
    Ok(float_col.f64()?.into_iter().collect())
}

/// Column names starting with `<prefix>_`, in frame order
pub fn prefixed_columns(df: &DataFrame, prefix: &str) -> Vec<String> {
    let prefix = format!("{}_", prefix);
    df.get_column_names()
        .iter()
        .filter(|name| name.starts_with(&prefix))
        .map(|name| name.to_string())
        .collect()
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
