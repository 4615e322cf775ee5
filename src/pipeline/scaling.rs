//! Z-score standardization of numeric columns

use polars::prelude::*;
use serde::Serialize;

use super::error::EtlError;

/// Parameters fitted for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnScaling {
    pub column: String,
    pub mean: f64,
    /// Population standard deviation (divided by n)
    pub std: f64,
}

/// Mean and population standard deviation of a slice.
///
/// Uses Welford's single-pass update for numerical stability.
pub fn mean_and_population_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }

    let mut count = 0.0;
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for &x in values {
        count += 1.0;
        let delta = x - mean;
        mean += delta / count;
        m2 += delta * (x - mean);
    }

    Some((mean, (m2 / count).sqrt()))
}

/// Replace each listed column with its z-scores, fitted over the whole frame.
///
/// Columns must be free of nulls (the cleaning step guarantees this). A
/// column with zero or non-finite standard deviation fails with
/// `EtlError::DegenerateColumn`.
pub fn standardize(
    mut df: DataFrame,
    columns: &[&str],
) -> Result<(DataFrame, Vec<ColumnScaling>), EtlError> {
    let rows = df.height();
    let mut fitted = Vec::with_capacity(columns.len());

    for &name in columns {
        let float_col = df.column(name)?.cast(&DataType::Float64)?;
        let values: Vec<f64> = float_col.f64()?.into_no_null_iter().collect();

        let (mean, std) = mean_and_population_std(&values).ok_or_else(|| {
            EtlError::DegenerateColumn {
                column: name.to_string(),
                rows,
            }
        })?;

        if std == 0.0 || !std.is_finite() || !mean.is_finite() {
            return Err(EtlError::DegenerateColumn {
                column: name.to_string(),
                rows,
            });
        }

        let scaled: Vec<f64> = values.iter().map(|x| (x - mean) / std).collect();
        df.with_column(Column::new(name.into(), scaled))?;

        fitted.push(ColumnScaling {
            column: name.to_string(),
            mean,
            std,
        });
    }

    Ok((df, fitted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let (mean, std) = mean_and_population_std(&values).unwrap();
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_slice_has_no_moments() {
        assert!(mean_and_population_std(&[]).is_none());
    }

    #[test]
    fn test_standardize_replaces_in_place() {
        let df = df! {
            "x" => [1.0f64, 2.0, 3.0],
            "y" => [1i64, 1, 1],
        }
        .unwrap();

        let (scaled, params) = standardize(df, &["x"]).unwrap();
        let names: Vec<String> = scaled.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(params[0].column, "x");
        assert!((params[0].mean - 2.0).abs() < 1e-12);

        let x: Vec<f64> = scaled.column("x").unwrap().f64().unwrap().into_no_null_iter().collect();
        assert!((x[1]).abs() < 1e-12);
        assert!((x[0] + x[2]).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_is_degenerate() {
        let df = df! { "x" => [3.0f64, 3.0, 3.0] }.unwrap();
        let err = standardize(df, &["x"]).unwrap_err();
        assert!(matches!(err, EtlError::DegenerateColumn { ref column, rows: 3 } if column == "x"));
    }
}
