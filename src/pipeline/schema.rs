//! Fixed column contract for the raw diabetes dataset and its typed records

use std::fmt;

use polars::prelude::*;

use super::error::EtlError;

/// Semantic kind of a raw column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Categorical,
    Numeric,
    Flag,
}

impl ColumnKind {
    fn dtype(&self) -> DataType {
        match self {
            ColumnKind::Categorical => DataType::String,
            ColumnKind::Numeric => DataType::Float64,
            ColumnKind::Flag => DataType::Int64,
        }
    }
}

pub const GENDER: &str = "gender";
pub const AGE: &str = "age";
pub const HYPERTENSION: &str = "hypertension";
pub const HEART_DISEASE: &str = "heart_disease";
pub const SMOKING_HISTORY: &str = "smoking_history";
pub const BMI: &str = "bmi";
pub const HBA1C_LEVEL: &str = "HbA1c_level";
pub const BLOOD_GLUCOSE_LEVEL: &str = "blood_glucose_level";
pub const DIABETES: &str = "diabetes";

/// The schema contract: names, order and kinds of the raw columns.
pub const SCHEMA: [(&str, ColumnKind); 9] = [
    (GENDER, ColumnKind::Categorical),
    (AGE, ColumnKind::Numeric),
    (HYPERTENSION, ColumnKind::Flag),
    (HEART_DISEASE, ColumnKind::Flag),
    (SMOKING_HISTORY, ColumnKind::Categorical),
    (BMI, ColumnKind::Numeric),
    (HBA1C_LEVEL, ColumnKind::Numeric),
    (BLOOD_GLUCOSE_LEVEL, ColumnKind::Numeric),
    (DIABETES, ColumnKind::Flag),
];

/// Columns that are z-score standardized after encoding
pub const NUMERIC_COLUMNS: [&str; 4] = [AGE, BMI, HBA1C_LEVEL, BLOOD_GLUCOSE_LEVEL];

/// Categorical columns expanded into indicator columns
pub const CATEGORICAL_COLUMNS: [&str; 2] = [GENDER, SMOKING_HISTORY];

/// Label column
pub const LABEL_COLUMN: &str = DIABETES;

pub fn expected_columns() -> Vec<String> {
    SCHEMA.iter().map(|(name, _)| name.to_string()).collect()
}

/// Valid gender values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Female" => Some(Gender::Female),
            "Male" => Some(Gender::Male),
            "Other" => Some(Gender::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw observation. Every field may be null.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub gender: Option<String>,
    pub age: Option<f64>,
    pub hypertension: Option<i64>,
    pub heart_disease: Option<i64>,
    pub smoking_history: Option<String>,
    pub bmi: Option<f64>,
    pub hba1c_level: Option<f64>,
    pub blood_glucose_level: Option<f64>,
    pub diabetes: Option<i64>,
}

/// Hashable identity of a record; floats compare by bit pattern with `-0.0`
/// folded into `0.0`, nulls equal nulls.
pub(crate) type RecordKey = (
    Option<String>,
    Option<u64>,
    Option<i64>,
    Option<i64>,
    Option<String>,
    Option<u64>,
    Option<u64>,
    Option<u64>,
    Option<i64>,
);

impl Record {
    pub(crate) fn key(&self) -> RecordKey {
        let bits = |v: Option<f64>| v.map(|x| (if x == 0.0 { 0.0f64 } else { x }).to_bits());
        (
            self.gender.clone(),
            bits(self.age),
            self.hypertension,
            self.heart_disease,
            self.smoking_history.clone(),
            bits(self.bmi),
            bits(self.hba1c_level),
            bits(self.blood_glucose_level),
            self.diabetes,
        )
    }

    pub fn has_null(&self) -> bool {
        self.gender.is_none()
            || self.age.is_none()
            || self.hypertension.is_none()
            || self.heart_disease.is_none()
            || self.smoking_history.is_none()
            || self.bmi.is_none()
            || self.hba1c_level.is_none()
            || self.blood_glucose_level.is_none()
            || self.diabetes.is_none()
    }
}

/// An accepted record: no nulls, validated gender.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub gender: Gender,
    pub age: f64,
    pub hypertension: i64,
    pub heart_disease: i64,
    pub smoking_history: String,
    pub bmi: f64,
    pub hba1c_level: f64,
    pub blood_glucose_level: f64,
    pub diabetes: i64,
}

impl CleanRecord {
    /// Returns `None` when any field is null or the gender is outside the valid set.
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            gender: Gender::parse(record.gender.as_deref()?)?,
            age: record.age?,
            hypertension: record.hypertension?,
            heart_disease: record.heart_disease?,
            smoking_history: record.smoking_history.clone()?,
            bmi: record.bmi?,
            hba1c_level: record.hba1c_level?,
            blood_glucose_level: record.blood_glucose_level?,
            diabetes: record.diabetes?,
        })
    }
}

/// Check the loaded column names against the contract: exact names, exact order.
pub fn validate_schema(df: &DataFrame) -> Result<(), EtlError> {
    let found: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let expected = expected_columns();

    if found == expected {
        return Ok(());
    }

    Err(EtlError::Schema {
        detail: describe_mismatch(&expected, &found),
        expected,
        found,
    })
}

fn describe_mismatch(expected: &[String], found: &[String]) -> String {
    let missing: Vec<&str> = expected
        .iter()
        .filter(|c| !found.contains(c))
        .map(|c| c.as_str())
        .collect();
    let unexpected: Vec<&str> = found
        .iter()
        .filter(|c| !expected.contains(c))
        .map(|c| c.as_str())
        .collect();

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing column(s): {}", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        parts.push(format!("unexpected column(s): {}", unexpected.join(", ")));
    }
    if parts.is_empty() {
        // Same set of names, so the order (or a duplicate) is wrong.
        let misplaced: Vec<String> = expected
            .iter()
            .zip(found.iter())
            .enumerate()
            .filter(|(_, (e, f))| e != f)
            .map(|(i, (e, f))| format!("position {} has '{}' instead of '{}'", i, f, e))
            .collect();
        parts.push(format!("columns out of order ({})", misplaced.join("; ")));
    }
    parts.join("; ")
}

/// Cast a column to the dtype of its kind.
///
/// Values that turn null in the cast could not be parsed; any such value is a
/// schema violation.
fn typed_column(df: &DataFrame, name: &str, kind: ColumnKind) -> Result<Column, EtlError> {
    let column = df.column(name)?;
    let typed = column.cast(&kind.dtype())?;

    let unparsable = typed.null_count().saturating_sub(column.null_count());
    if unparsable == 0 {
        return Ok(typed);
    }

    Err(EtlError::Schema {
        expected: expected_columns(),
        found: df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        detail: format!(
            "column '{}' has {} value(s) of type {} that cannot be read as {:?}",
            name,
            unparsable,
            column.dtype(),
            kind
        ),
    })
}

/// NaN and infinities count as missing
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Convert a schema-validated frame into typed records.
pub fn records_from_frame(df: &DataFrame) -> Result<Vec<Record>, EtlError> {
    validate_schema(df)?;

    let gender = typed_column(df, GENDER, ColumnKind::Categorical)?;
    let age = typed_column(df, AGE, ColumnKind::Numeric)?;
    let hypertension = typed_column(df, HYPERTENSION, ColumnKind::Flag)?;
    let heart_disease = typed_column(df, HEART_DISEASE, ColumnKind::Flag)?;
    let smoking = typed_column(df, SMOKING_HISTORY, ColumnKind::Categorical)?;
    let bmi = typed_column(df, BMI, ColumnKind::Numeric)?;
    let hba1c = typed_column(df, HBA1C_LEVEL, ColumnKind::Numeric)?;
    let glucose = typed_column(df, BLOOD_GLUCOSE_LEVEL, ColumnKind::Numeric)?;
    let diabetes = typed_column(df, DIABETES, ColumnKind::Flag)?;

    let gender = gender.str()?;
    let age = age.f64()?;
    let hypertension = hypertension.i64()?;
    let heart_disease = heart_disease.i64()?;
    let smoking = smoking.str()?;
    let bmi = bmi.f64()?;
    let hba1c = hba1c.f64()?;
    let glucose = glucose.f64()?;
    let diabetes = diabetes.i64()?;

    let records = (0..df.height())
        .map(|i| Record {
            gender: gender.get(i).map(str::to_string),
            age: finite(age.get(i)),
            hypertension: hypertension.get(i),
            heart_disease: heart_disease.get(i),
            smoking_history: smoking.get(i).map(str::to_string),
            bmi: finite(bmi.get(i)),
            hba1c_level: finite(hba1c.get(i)),
            blood_glucose_level: finite(glucose.get(i)),
            diabetes: diabetes.get(i),
        })
        .collect();

    Ok(records)
}

/// Build a frame in the raw schema from records (used for the quarantine file).
///
/// An empty slice yields a frame with typed, zero-length columns, so the CSV
/// writer still emits the header.
pub fn records_to_frame(records: &[Record]) -> Result<DataFrame, EtlError> {
    let strs = |f: fn(&Record) -> Option<&str>| records.iter().map(f).collect::<Vec<_>>();
    let floats = |f: fn(&Record) -> Option<f64>| records.iter().map(f).collect::<Vec<_>>();
    let ints = |f: fn(&Record) -> Option<i64>| records.iter().map(f).collect::<Vec<_>>();

    let columns = vec![
        Column::new(GENDER.into(), strs(|r| r.gender.as_deref())),
        Column::new(AGE.into(), floats(|r| r.age)),
        Column::new(HYPERTENSION.into(), ints(|r| r.hypertension)),
        Column::new(HEART_DISEASE.into(), ints(|r| r.heart_disease)),
        Column::new(SMOKING_HISTORY.into(), strs(|r| r.smoking_history.as_deref())),
        Column::new(BMI.into(), floats(|r| r.bmi)),
        Column::new(HBA1C_LEVEL.into(), floats(|r| r.hba1c_level)),
        Column::new(BLOOD_GLUCOSE_LEVEL.into(), floats(|r| r.blood_glucose_level)),
        Column::new(DIABETES.into(), ints(|r| r.diabetes)),
    ];

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse_is_case_sensitive() {
        assert_eq!(Gender::parse("Male"), Some(Gender::Male));
        assert_eq!(Gender::parse("male"), None);
        assert_eq!(Gender::parse("Unknown"), None);
    }

    #[test]
    fn test_describe_mismatch_reports_missing_and_unexpected() {
        let expected = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let found = vec!["a".to_string(), "x".to_string(), "c".to_string()];
        let detail = describe_mismatch(&expected, &found);
        assert!(detail.contains("missing column(s): b"));
        assert!(detail.contains("unexpected column(s): x"));
    }

    #[test]
    fn test_describe_mismatch_reports_order() {
        let expected = vec!["a".to_string(), "b".to_string()];
        let found = vec!["b".to_string(), "a".to_string()];
        let detail = describe_mismatch(&expected, &found);
        assert!(detail.contains("out of order"));
        assert!(detail.contains("position 0 has 'b' instead of 'a'"));
    }

    #[test]
    fn test_clean_record_rejects_nulls() {
        let record = Record {
            gender: Some("Female".to_string()),
            age: Some(30.0),
            hypertension: Some(0),
            heart_disease: Some(0),
            smoking_history: None,
            bmi: Some(25.0),
            hba1c_level: Some(5.0),
            blood_glucose_level: Some(100.0),
            diabetes: Some(0),
        };
        assert!(record.has_null());
        assert!(CleanRecord::from_record(&record).is_none());
    }

    #[test]
    fn test_negative_zero_has_the_same_key() {
        let base = Record {
            gender: Some("Male".to_string()),
            age: Some(0.0),
            hypertension: Some(0),
            heart_disease: Some(0),
            smoking_history: Some("never".to_string()),
            bmi: Some(25.0),
            hba1c_level: Some(5.0),
            blood_glucose_level: Some(100.0),
            diabetes: Some(0),
        };
        let negative = Record {
            age: Some(-0.0),
            ..base.clone()
        };
        assert_eq!(base.key(), negative.key());
    }

    #[test]
    fn test_finite_drops_nan_and_infinity() {
        assert_eq!(finite(Some(f64::NAN)), None);
        assert_eq!(finite(Some(f64::INFINITY)), None);
        assert_eq!(finite(Some(2.5)), Some(2.5));
    }

    #[test]
    fn test_records_to_frame_empty_keeps_schema() {
        let df = records_to_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 9);
        validate_schema(&df).unwrap();
    }
}
