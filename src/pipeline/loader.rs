//! Dataset loader for CSV files

use std::path::Path;

use polars::prelude::*;

use super::error::EtlError;

/// Cell tokens read as missing values, in addition to empty fields.
pub const NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn null_values() -> NullValues {
    NullValues::AllColumns(NULL_TOKENS.iter().map(|t| PlSmallStr::from(*t)).collect())
}

/// Load a CSV file fully into memory.
///
/// The file is opened first so an unreadable path surfaces as `EtlError::Io`
/// rather than an opaque parser error. Any of [`NULL_TOKENS`] becomes a null.
pub fn load_csv(path: &Path) -> Result<DataFrame, EtlError> {
    std::fs::File::open(path).map_err(|e| EtlError::io(path, e))?;

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_null_values(Some(null_values()))
        .finish()?
        .collect()?;

    Ok(df)
}

/// Load the raw dataset and return it with its shape and estimated size in MB.
pub fn load_dataset_with_stats(path: &Path) -> Result<(DataFrame, usize, usize, f64), EtlError> {
    let df = load_csv(path)?;
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    Ok((df, rows, cols, memory_mb))
}

/// Write a frame as CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), EtlError> {
    let mut file = std::fs::File::create(path).map_err(|e| EtlError::io(path, e))?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}
