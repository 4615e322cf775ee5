//! Missing value analysis

use anyhow::Result;
use polars::prelude::*;

/// Share of null values per column, in the order given.
///
/// An empty frame yields a ratio of 0.0 for every column.
pub fn analyze_missing_values(df: &DataFrame, columns: &[&str]) -> Result<Vec<(String, f64)>> {
    let rows = df.height();
    let mut missing_ratios = Vec::with_capacity(columns.len());

    for &col_name in columns {
        let column = df.column(col_name)?;
        let ratio = if rows == 0 {
            0.0
        } else {
            column.null_count() as f64 / rows as f64
        };
        missing_ratios.push((col_name.to_string(), ratio));
    }

    Ok(missing_ratios)
}
