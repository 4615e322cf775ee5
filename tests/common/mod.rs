//! Shared test utilities and fixture generators
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use diabrisk::pipeline::Record;
use polars::prelude::*;
use tempfile::TempDir;

pub const RAW_HEADER: &str = "gender,age,hypertension,heart_disease,smoking_history,bmi,\
                              HbA1c_level,blood_glucose_level,diabetes";

const GENDERS: [&str; 3] = ["Female", "Male", "Other"];
const SMOKING: [&str; 6] = ["never", "No Info", "current", "former", "ever", "not current"];

/// `n` distinct, valid raw rows with both label values and every category.
///
/// Every fourth row is labelled 1. Rows stay unique for n <= 200.
pub fn valid_raw_rows(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format!(
                "{},{:.1},{},{},{},{:.2},{:.1},{},{}",
                GENDERS[i % 3],
                20.0 + ((i * 7) % 60) as f64,
                i32::from(i % 5 == 0),
                i32::from(i % 7 == 0),
                SMOKING[i % 6],
                18.5 + ((i * 3) % 20) as f64 + 0.25,
                4.0 + (i % 5) as f64 * 0.8,
                80 + (i * 13) % 200,
                i32::from(i % 4 == 0),
            )
        })
        .collect()
}

/// Rows that each trip exactly one cleaning rule, plus a duplicate of `valid_raw_rows(1)[0]`
pub fn invalid_raw_rows() -> Vec<String> {
    vec![
        // duplicate
        valid_raw_rows(1)[0].clone(),
        // invalid gender
        "Unknown,50.0,0,0,never,25.0,5.5,120,0".to_string(),
        // gender is case-sensitive
        "male,51.0,0,0,never,26.0,5.5,120,0".to_string(),
        // negative age
        "Female,-1.0,0,0,never,24.0,5.0,100,0".to_string(),
        // zero bmi
        "Male,33.0,0,0,current,0.0,6.0,140,1".to_string(),
        // null bmi: dropped, not quarantined
        "Female,45.0,0,0,never,,5.0,100,0".to_string(),
        // missing-value tokens: dropped like empty fields
        "Male,NA,0,0,never,24.0,5.0,100,0".to_string(),
        "Female,47.0,0,0,never,NaN,5.0,100,0".to_string(),
        "Other,52.0,0,0,null,26.0,5.0,100,0".to_string(),
        "Female,48.0,0,0,never,25.0,N/A,100,0".to_string(),
    ]
}

/// Write a raw CSV with the contract header
pub fn write_raw_csv(dir: &Path, file_name: &str, rows: &[String]) -> PathBuf {
    write_csv_text(dir, file_name, RAW_HEADER, rows)
}

pub fn write_csv_text(dir: &Path, file_name: &str, header: &str, rows: &[String]) -> PathBuf {
    let path = dir.join(file_name);
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Temporary directory holding a raw CSV with valid and invalid rows
pub fn create_raw_fixture(valid_rows: usize) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let mut rows = valid_raw_rows(valid_rows);
    rows.extend(invalid_raw_rows());
    let path = write_raw_csv(temp_dir.path(), "raw.csv", &rows);
    (temp_dir, path)
}

/// A record with the given gender/age/bmi and plausible values elsewhere
pub fn record(gender: Option<&str>, age: Option<f64>, bmi: Option<f64>) -> Record {
    Record {
        gender: gender.map(str::to_string),
        age,
        hypertension: Some(0),
        heart_disease: Some(0),
        smoking_history: Some("never".to_string()),
        bmi,
        hba1c_level: Some(5.5),
        blood_glucose_level: Some(110.0),
        diabetes: Some(0),
    }
}

/// Encoded-dataset frame with the numeric columns, the flags and the label
pub fn create_encoded_dataframe() -> DataFrame {
    df! {
        "age" => [65.0f64, 70.0, 61.0, 30.0, 45.0, 25.0, 50.0, 35.0, 40.0, 55.0],
        "hypertension" => [1i64, 0, 0, 0, 1, 0, 0, 0, 0, 0],
        "heart_disease" => [0i64, 1, 0, 0, 0, 0, 0, 0, 0, 0],
        "bmi" => [31.0f64, 22.0, 27.5, 24.0, 33.0, 21.0, 26.0, 29.0, 30.0, 23.0],
        "HbA1c_level" => [6.6f64, 5.8, 6.2, 4.8, 6.0, 4.5, 5.0, 5.7, 5.9, 4.9],
        "blood_glucose_level" => [
            200.0f64, 140.0, 190.0, 90.0, 160.0, 85.0, 100.0, 130.0, 126.0, 95.0
        ],
        "diabetes" => [1i64, 0, 1, 0, 1, 0, 0, 0, 0, 0],
        "gender_Male" => [1i32, 0, 0, 1, 0, 1, 0, 1, 0, 1],
        "smoking_history_current" => [1i32, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        "smoking_history_former" => [0i32, 0, 1, 0, 0, 0, 0, 0, 0, 0],
        "smoking_history_never" => [0i32, 1, 0, 1, 1, 0, 1, 1, 0, 1],
    }
    .unwrap()
}

/// Write a frame to `<dir>/<file_name>` as CSV
pub fn write_frame(dir: &Path, file_name: &str, df: &mut DataFrame) -> PathBuf {
    let path = dir.join(file_name);
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    path
}

/// Names of the regular files in a directory, sorted
pub fn list_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().unwrap().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(
        rows, expected_rows,
        "Row count mismatch: expected {}, got {}",
        expected_rows, rows
    );
    assert_eq!(
        cols, expected_cols,
        "Column count mismatch: expected {}, got {}",
        expected_cols, cols
    );
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Label column of a frame as i64 values
pub fn labels(df: &DataFrame) -> Vec<i64> {
    df.column("diabetes")
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} (±{}), got {}",
        expected,
        tol,
        actual
    );
}
