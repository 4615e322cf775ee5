//! Tests for one-hot encoding and standardization of the accepted records

#[path = "common/mod.rs"]
mod common;

use common::{assert_close, column_names, create_raw_fixture};
use diabrisk::pipeline::{
    load_csv, one_hot_encode, partition_records, records_from_frame, standardize, CleanRecord,
    EtlError, NUMERIC_COLUMNS,
};

fn accepted_records(valid_rows: usize) -> Vec<CleanRecord> {
    let (_dir, path) = create_raw_fixture(valid_rows);
    let df = load_csv(&path).unwrap();
    partition_records(records_from_frame(&df).unwrap()).accepted
}

#[test]
fn test_reference_levels_are_dropped() {
    let encoded = one_hot_encode(&accepted_records(30)).unwrap();
    let names = column_names(&encoded.df);

    assert_eq!(
        names,
        vec![
            "age",
            "hypertension",
            "heart_disease",
            "bmi",
            "HbA1c_level",
            "blood_glucose_level",
            "diabetes",
            "gender_Male",
            "gender_Other",
            "smoking_history_current",
            "smoking_history_ever",
            "smoking_history_former",
            "smoking_history_never",
            "smoking_history_not current",
        ]
    );
    assert_eq!(encoded.encodings[0].reference, "Female");
    assert_eq!(encoded.encodings[1].reference, "No Info");
}

#[test]
fn test_encoding_is_deterministic() {
    let records = accepted_records(30);
    let mut reversed = records.clone();
    reversed.reverse();

    let first = one_hot_encode(&records).unwrap();
    let second = one_hot_encode(&records).unwrap();
    let from_reversed = one_hot_encode(&reversed).unwrap();

    assert!(first.df.equals(&second.df));
    assert_eq!(first.encodings, from_reversed.encodings);
    assert_eq!(column_names(&first.df), column_names(&from_reversed.df));
}

#[test]
fn test_indicators_sum_to_at_most_one() {
    let encoded = one_hot_encode(&accepted_records(30)).unwrap();
    let df = &encoded.df;

    for encoding in &encoded.encodings {
        let mut sums = vec![0i64; df.height()];
        for name in encoding.indicator_names() {
            let values = df.column(&name).unwrap().cast(&polars::prelude::DataType::Int64).unwrap();
            for (sum, v) in sums.iter_mut().zip(values.i64().unwrap().into_no_null_iter()) {
                *sum += v;
            }
        }
        assert!(sums.iter().all(|s| *s <= 1), "column {}", encoding.column);
    }
}

#[test]
fn test_standardized_columns_have_zero_mean_unit_std() {
    let encoded = one_hot_encode(&accepted_records(40)).unwrap();
    let (scaled, params) = standardize(encoded.df, &NUMERIC_COLUMNS).unwrap();

    assert_eq!(params.len(), 4);
    for column in NUMERIC_COLUMNS {
        let values: Vec<f64> = scaled
            .column(column)
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();
        assert_close(mean, 0.0, 1e-9);
        assert_close(std, 1.0, 1e-9);
    }
}

#[test]
fn test_zero_variance_column_fails() {
    let mut records = accepted_records(10);
    for r in &mut records {
        r.bmi = 27.0;
    }
    let encoded = one_hot_encode(&records).unwrap();

    match standardize(encoded.df, &NUMERIC_COLUMNS) {
        Err(EtlError::DegenerateColumn { column, rows }) => {
            assert_eq!(column, "bmi");
            assert_eq!(rows, 10);
        }
        other => panic!("Expected DegenerateColumn, got {:?}", other.map(|(df, _)| df.shape())),
    }
}
