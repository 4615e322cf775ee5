//! Correlation export to JSON

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::analysis::round_to;

/// Serialize `value` as JSON with 4-space indentation.
pub fn to_json_pretty4<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("Failed to serialize JSON")?;
    String::from_utf8(buf).context("Serialized JSON is not valid UTF-8")
}

/// Build the ordered `feature -> correlation` mapping, rounded to 4 decimals.
///
/// Key order follows the input order (descending correlation).
pub fn correlation_mapping(correlations: &[(String, f64)]) -> Map<String, Value> {
    correlations
        .iter()
        .map(|(feature, r)| (feature.clone(), Value::from(round_to(*r, 4))))
        .collect()
}

/// Export correlations with the label to a JSON object file
///
/// # Arguments
/// * `correlations` - Feature/correlation pairs, already sorted
/// * `output_path` - Path to write the JSON file
pub fn export_correlations(correlations: &[(String, f64)], output_path: &Path) -> Result<()> {
    let json = to_json_pretty4(&correlation_mapping(correlations))
        .context("Failed to serialize correlations to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write correlations to {}", output_path.display()))?;

    Ok(())
}
