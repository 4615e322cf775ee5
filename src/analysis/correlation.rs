//! Pearson correlation: against the label, as a full matrix, and the
//! multicollinearity scan over the matrix's upper triangle

use anyhow::{bail, Result};
use faer::Mat;
use polars::prelude::*;
use serde::Serialize;

use super::frame::column_as_f64;

/// Represents a correlated pair of features
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Pearson correlation over the rows where both values are present.
///
/// Single-pass Welford update for numerical stability. Returns `None` when
/// fewer than two complete pairs exist or either side has zero variance.
pub fn pearson_correlation(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    if xs.len() != ys.len() {
        return None;
    }

    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2.0 || var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov_xy / (var_x.sqrt() * var_y.sqrt()))
}

/// Correlation of each feature with `target`, sorted descending.
///
/// Features whose correlation is undefined (constant column) are skipped.
pub fn correlations_with_target(
    df: &DataFrame,
    features: &[&str],
    target: &str,
) -> Result<Vec<(String, f64)>> {
    let target_values = column_as_f64(df, target)?;
    let mut correlations = Vec::with_capacity(features.len());

    for &feature in features {
        let values = column_as_f64(df, feature)?;
        match pearson_correlation(&values, &target_values) {
            Some(r) => correlations.push((feature.to_string(), r)),
            None => tracing::warn!(feature, target, "correlation undefined, skipping"),
        }
    }

    correlations.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(correlations)
}

/// Square correlation matrix with its column names
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Mat<f64>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Element-wise absolute values
    pub fn abs(&self) -> CorrelationMatrix {
        let n = self.len();
        let mut values = Mat::<f64>::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                values[(i, j)] = self.values[(i, j)].abs();
            }
        }
        CorrelationMatrix {
            names: self.names.clone(),
            values,
        }
    }
}

/// Compute the correlation matrix with matrix operations.
///
/// Algorithm:
/// 1. Keep rows where every listed column is present
/// 2. Standardize each column: Z = (X - mean) / (std * sqrt(n))
/// 3. R = Z^T * Z
///
/// A constant column has an undefined correlation; its row and column are NaN.
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> Result<CorrelationMatrix> {
    let raw: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|name| column_as_f64(df, name))
        .collect::<Result<_>>()?;

    let n_cols = columns.len();
    let complete_rows: Vec<usize> = (0..df.height())
        .filter(|&row| raw.iter().all(|col| col[row].is_some()))
        .collect();
    let n_rows = complete_rows.len();

    if n_rows < 2 {
        bail!(
            "Need at least 2 complete rows to correlate {:?}, found {}",
            columns,
            n_rows
        );
    }

    let mut z = Mat::<f64>::zeros(n_rows, n_cols);
    let mut constant = vec![false; n_cols];

    for (col_idx, col) in raw.iter().enumerate() {
        let values: Vec<f64> = complete_rows.iter().filter_map(|&r| col[r]).collect();
        let mean = values.iter().sum::<f64>() / n_rows as f64;
        let ss: f64 = values.iter().map(|x| (x - mean) * (x - mean)).sum();

        if ss == 0.0 {
            constant[col_idx] = true;
            continue;
        }

        // sqrt(ss) = std * sqrt(n), so Z^T Z is the correlation directly
        let scale = ss.sqrt();
        for (row_idx, x) in values.iter().enumerate() {
            z[(row_idx, col_idx)] = (x - mean) / scale;
        }
    }

    let mut values = z.transpose() * &z;

    for i in 0..n_cols {
        for j in 0..n_cols {
            if constant[i] || constant[j] {
                values[(i, j)] = f64::NAN;
            } else {
                // Clamp floating-point drift so |r| never exceeds 1
                values[(i, j)] = values[(i, j)].clamp(-1.0, 1.0);
            }
        }
    }

    Ok(CorrelationMatrix {
        names: columns.iter().map(|s| s.to_string()).collect(),
        values,
    })
}

/// Pairs from the strict upper triangle whose absolute correlation exceeds
/// `threshold`, in row-major order. The reported correlation is absolute.
pub fn find_correlated_pairs(matrix: &CorrelationMatrix, threshold: f64) -> Vec<CorrelatedPair> {
    let abs = matrix.abs();
    let n = abs.len();
    let mut pairs = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            let corr = abs.get(i, j);
            if corr > threshold && !corr.is_nan() {
                pairs.push(CorrelatedPair {
                    feature1: abs.names[i].clone(),
                    feature2: abs.names[j].clone(),
                    correlation: corr,
                });
            }
        }
    }

    pairs
}
