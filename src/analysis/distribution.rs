//! Value counts, prevalence and the binned/grouped data behind the plots

use anyhow::{bail, Result};
use polars::prelude::*;

use super::frame::{column_as_f64, prefixed_columns, round_to};

/// Label used for rows whose indicators are all zero
pub const REFERENCE_LEVEL: &str = "reference";

/// Counts of each distinct value of one indicator column, ascending by value
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCounts {
    pub column: String,
    pub counts: Vec<(i64, usize)>,
}

/// Value counts for every `<prefix>_*` indicator column.
pub fn indicator_value_counts(df: &DataFrame, prefix: &str) -> Result<Vec<ValueCounts>> {
    prefixed_columns(df, prefix)
        .into_iter()
        .map(|column| {
            let mut counts: Vec<(i64, usize)> = Vec::new();
            for value in column_as_f64(df, &column)?.into_iter().flatten() {
                let key = value as i64;
                match counts.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((key, 1)),
                }
            }
            counts.sort_by_key(|(k, _)| *k);
            Ok(ValueCounts { column, counts })
        })
        .collect()
}

/// Percentage of rows with label = 1 among rows with a label.
pub fn prevalence_pct(df: &DataFrame, label: &str) -> Result<f64> {
    let labels: Vec<f64> = column_as_f64(df, label)?.into_iter().flatten().collect();
    if labels.is_empty() {
        bail!("Label column '{}' has no values", label);
    }
    Ok(labels.iter().filter(|y| **y == 1.0).count() as f64 / labels.len() as f64 * 100.0)
}

/// Decode the category of each row from its indicator columns.
///
/// Rows with every indicator at zero belong to the reference category.
pub fn decode_indicators(df: &DataFrame, prefix: &str) -> Result<Vec<String>> {
    let columns = prefixed_columns(df, prefix);
    let strip = format!("{}_", prefix);
    let mut categories = vec![REFERENCE_LEVEL.to_string(); df.height()];

    for column in &columns {
        let level = column.trim_start_matches(strip.as_str());
        for (category, v) in categories.iter_mut().zip(column_as_f64(df, column)?) {
            if v == Some(1.0) {
                *category = level.to_string();
            }
        }
    }

    Ok(categories)
}

/// Label prevalence (%) per decoded category, sorted ascending by prevalence.
pub fn prevalence_by_category(
    df: &DataFrame,
    prefix: &str,
    label: &str,
) -> Result<Vec<(String, f64)>> {
    let categories = decode_indicators(df, prefix)?;
    let labels = column_as_f64(df, label)?;

    let mut groups: Vec<(String, f64, usize)> = Vec::new();
    for (category, y) in categories.into_iter().zip(labels) {
        let Some(y) = y else { continue };
        match groups.iter_mut().find(|(c, _, _)| *c == category) {
            Some((_, sum, n)) => {
                *sum += y;
                *n += 1;
            }
            None => groups.push((category, y, 1)),
        }
    }

    let mut prevalence: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(c, sum, n)| (c, sum / n as f64 * 100.0))
        .collect();
    prevalence.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    Ok(prevalence)
}

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning min..=max.
    ///
    /// The last bin is closed on the right. When all values are equal the
    /// range is widened by 0.5 on each side.
    pub fn build(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Self { edges, counts })
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Non-null values of `column` grouped by label value, ascending by label
pub fn values_by_label(df: &DataFrame, column: &str, label: &str) -> Result<Vec<(i64, Vec<f64>)>> {
    let values = column_as_f64(df, column)?;
    let labels = column_as_f64(df, label)?;

    let mut groups: Vec<(i64, Vec<f64>)> = Vec::new();
    for (v, y) in values.into_iter().zip(labels) {
        let (Some(v), Some(y)) = (v, y) else { continue };
        let key = y as i64;
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(v),
            None => groups.push((key, vec![v])),
        }
    }
    groups.sort_by_key(|(k, _)| *k);
    Ok(groups)
}

/// Prevalence rounded for display
pub fn prevalence_display(pct: f64) -> String {
    format!("{:.2}%", round_to(pct, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_last_bin_is_closed() {
        let hist = Histogram::build(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!(hist.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(hist.counts, vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_histogram_constant_values() {
        let hist = Histogram::build(&[2.0, 2.0], 10).unwrap();
        assert_eq!(hist.counts.iter().sum::<usize>(), 2);
        assert!(hist.edges[0] < 2.0 && *hist.edges.last().unwrap() > 2.0);
    }

    #[test]
    fn test_decode_indicators_falls_back_to_reference() {
        let df = df! {
            "smoking_history_current" => [1i32, 0, 0],
            "smoking_history_never" => [0i32, 1, 0],
        }
        .unwrap();
        let decoded = decode_indicators(&df, "smoking_history").unwrap();
        assert_eq!(decoded, vec!["current", "never", "reference"]);
    }

    #[test]
    fn test_prevalence_by_category_sorted_ascending() {
        let df = df! {
            "smoking_history_current" => [1i32, 1, 0, 0],
            "diabetes" => [1i64, 1, 0, 1],
        }
        .unwrap();
        let prevalence = prevalence_by_category(&df, "smoking_history", "diabetes").unwrap();
        assert_eq!(
            prevalence,
            vec![("reference".to_string(), 50.0), ("current".to_string(), 100.0)]
        );
    }
}
