//! Tests for the seeded stratified split

#[path = "common/mod.rs"]
mod common;

use std::collections::HashSet;

use common::labels;
use diabrisk::pipeline::{stratified_indices, stratified_split, test_size, EtlError};
use polars::prelude::*;

fn imbalanced_labels(rows: usize) -> Vec<i64> {
    // roughly 9% positive, like the real dataset
    (0..rows).map(|i| i64::from(i % 11 == 0)).collect()
}

#[test]
fn test_sizes_add_up_and_partitions_are_disjoint() {
    let labels = imbalanced_labels(1000);
    let split = stratified_indices(&labels, 0.2, 42).unwrap();

    assert_eq!(split.test.len(), 200);
    assert_eq!(split.train.len() + split.test.len(), 1000);

    let train: HashSet<usize> = split.train.iter().copied().collect();
    assert!(split.test.iter().all(|i| !train.contains(i)));
}

#[test]
fn test_label_proportion_preserved() {
    let labels = imbalanced_labels(1000);
    let split = stratified_indices(&labels, 0.2, 7).unwrap();

    let overall = labels.iter().sum::<i64>() as f64 / labels.len() as f64;
    for part in [&split.train, &split.test] {
        let positives = part.iter().filter(|&&i| labels[i] == 1).count() as f64;
        let share = positives / part.len() as f64;
        assert!(
            (share - overall).abs() <= 1.0 / part.len() as f64,
            "share {} vs overall {}",
            share,
            overall
        );
    }
}

#[test]
fn test_same_seed_same_split() {
    let labels = imbalanced_labels(500);

    let a = stratified_indices(&labels, 0.25, 123).unwrap();
    let b = stratified_indices(&labels, 0.25, 123).unwrap();
    let c = stratified_indices(&labels, 0.25, 124).unwrap();

    assert_eq!(a, b);
    assert_ne!(a.test, c.test);
}

#[test]
fn test_too_few_rows_rejected() {
    assert_eq!(test_size(3, 0.2), 1);

    let err = stratified_indices(&[1], 0.2, 42).unwrap_err();
    assert!(matches!(err, EtlError::InsufficientRows { rows: 1, .. }));
}

#[test]
fn test_split_frame_keeps_row_order() {
    let ids: Vec<i64> = (0..50).collect();
    let diabetes: Vec<i64> = (0..50).map(|i| i64::from(i % 5 == 0)).collect();
    let df = DataFrame::new(vec![
        Column::new("id".into(), ids),
        Column::new("diabetes".into(), diabetes),
    ])
    .unwrap();

    let split = stratified_split(&df, "diabetes", 0.2, 42).unwrap();

    assert_eq!(split.train.height(), 40);
    assert_eq!(split.test.height(), 10);
    assert_eq!(labels(&split.test).iter().sum::<i64>(), 2);

    for part in [&split.train, &split.test] {
        let part_ids: Vec<i64> = part
            .column("id")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert!(part_ids.windows(2).all(|w| w[0] < w[1]));
    }
}
