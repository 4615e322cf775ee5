//! One-hot encoding of the categorical columns
//!
//! Levels are the observed values sorted in byte order. The first level is the
//! reference category: it gets no indicator column and is represented by all
//! indicators being zero. Sorting makes the layout identical across runs.

use std::collections::BTreeSet;

use polars::prelude::*;

use super::error::EtlError;
use super::schema::{
    CleanRecord, AGE, BLOOD_GLUCOSE_LEVEL, BMI, DIABETES, GENDER, HBA1C_LEVEL, HEART_DISEASE,
    HYPERTENSION, SMOKING_HISTORY,
};

/// Indicator layout chosen for one categorical column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEncoding {
    pub column: String,
    /// Level represented by all-zero indicators
    pub reference: String,
    /// Levels with their own indicator column, in column order
    pub levels: Vec<String>,
}

impl CategoryEncoding {
    /// Derive the encoding from observed values. Returns `None` when nothing was observed.
    pub fn fit<'a>(column: &str, values: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut sorted: Vec<String> = values
            .into_iter()
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        if sorted.is_empty() {
            return None;
        }
        let reference = sorted.remove(0);

        Some(Self {
            column: column.to_string(),
            reference,
            levels: sorted,
        })
    }

    /// Name of the indicator column for `level`, e.g. `smoking_history_current`
    pub fn indicator_name(&self, level: &str) -> String {
        format!("{}_{}", self.column, level)
    }

    pub fn indicator_names(&self) -> Vec<String> {
        self.levels.iter().map(|l| self.indicator_name(l)).collect()
    }

    fn indicator_columns<'a>(&self, values: impl Iterator<Item = &'a str> + Clone) -> Vec<Column> {
        self.levels
            .iter()
            .map(|level| {
                let flags: Vec<i32> = values
                    .clone()
                    .map(|v| i32::from(v == level.as_str()))
                    .collect();
                Column::new(self.indicator_name(level).into(), flags)
            })
            .collect()
    }
}

/// Encoded frame plus the encodings that produced its indicator columns
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    pub df: DataFrame,
    pub encodings: Vec<CategoryEncoding>,
}

/// Expand gender and smoking history into indicator columns.
///
/// Column order: the non-categorical columns in schema order, then the gender
/// indicators, then the smoking-history indicators.
pub fn one_hot_encode(records: &[CleanRecord]) -> Result<EncodedFrame, EtlError> {
    let gender_values = records.iter().map(|r| r.gender.as_str());
    let smoking_values = records.iter().map(|r| r.smoking_history.as_str());

    let mut columns = vec![
        Column::new(AGE.into(), records.iter().map(|r| r.age).collect::<Vec<f64>>()),
        Column::new(
            HYPERTENSION.into(),
            records.iter().map(|r| r.hypertension).collect::<Vec<i64>>(),
        ),
        Column::new(
            HEART_DISEASE.into(),
            records.iter().map(|r| r.heart_disease).collect::<Vec<i64>>(),
        ),
        Column::new(BMI.into(), records.iter().map(|r| r.bmi).collect::<Vec<f64>>()),
        Column::new(
            HBA1C_LEVEL.into(),
            records.iter().map(|r| r.hba1c_level).collect::<Vec<f64>>(),
        ),
        Column::new(
            BLOOD_GLUCOSE_LEVEL.into(),
            records
                .iter()
                .map(|r| r.blood_glucose_level)
                .collect::<Vec<f64>>(),
        ),
        Column::new(
            DIABETES.into(),
            records.iter().map(|r| r.diabetes).collect::<Vec<i64>>(),
        ),
    ];

    let mut encodings = Vec::with_capacity(2);
    if let Some(encoding) = CategoryEncoding::fit(GENDER, gender_values.clone()) {
        columns.extend(encoding.indicator_columns(gender_values));
        encodings.push(encoding);
    }
    if let Some(encoding) = CategoryEncoding::fit(SMOKING_HISTORY, smoking_values.clone()) {
        columns.extend(encoding.indicator_columns(smoking_values));
        encodings.push(encoding);
    }

    let df = DataFrame::new(columns)?;
    Ok(EncodedFrame { df, encodings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_picks_first_sorted_level_as_reference() {
        let encoding = CategoryEncoding::fit(
            "smoking_history",
            ["never", "No Info", "current", "former", "never"],
        )
        .unwrap();
        // Uppercase sorts before lowercase in byte order
        assert_eq!(encoding.reference, "No Info");
        assert_eq!(encoding.levels, vec!["current", "former", "never"]);
        assert_eq!(
            encoding.indicator_names(),
            vec![
                "smoking_history_current",
                "smoking_history_former",
                "smoking_history_never"
            ]
        );
    }

    #[test]
    fn test_fit_single_level_has_no_indicators() {
        let encoding = CategoryEncoding::fit("gender", ["Male", "Male"]).unwrap();
        assert_eq!(encoding.reference, "Male");
        assert!(encoding.levels.is_empty());
    }

    #[test]
    fn test_fit_empty_is_none() {
        assert!(CategoryEncoding::fit("gender", Vec::<&str>::new()).is_none());
    }
}
