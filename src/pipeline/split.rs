//! Seeded, stratified train/test partitioning
//!
//! The test partition gets `ceil(test_fraction * n)` rows. Each label class
//! receives its proportional share of the test rows, rounded with the
//! largest-remainder method so per-class counts never drift more than one row
//! from the exact proportion. Within a class, rows are shuffled with a seeded
//! `StdRng` and the first rows of the shuffle go to test. Both partitions keep
//! the original row order.

use std::collections::BTreeMap;

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::EtlError;

/// Row positions of each partition, both ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Split {
    pub train: DataFrame,
    pub test: DataFrame,
}

/// Number of test rows for `rows` rows at the given fraction.
pub fn test_size(rows: usize, test_fraction: f64) -> usize {
    // The epsilon keeps 0.2 * 10 from rounding up to 3.
    let exact = test_fraction * rows as f64;
    ((exact - 1e-9).ceil().max(0.0) as usize).min(rows)
}

/// Allocate `total` test rows across classes proportionally to their sizes.
fn allocate(class_sizes: &[(i64, usize)], rows: usize, total: usize) -> Vec<usize> {
    let mut counts: Vec<usize> = Vec::with_capacity(class_sizes.len());
    let mut remainders: Vec<(usize, usize)> = Vec::with_capacity(class_sizes.len());

    for (i, &(_, size)) in class_sizes.iter().enumerate() {
        let numerator = total * size;
        counts.push(numerator / rows);
        remainders.push((numerator % rows, i));
    }

    let assigned: usize = counts.iter().sum();
    // Largest remainder first; ties go to the lower label.
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, i) in remainders.iter().take(total - assigned) {
        counts[i] += 1;
    }

    counts
}

/// Compute the stratified partition for a label vector.
pub fn stratified_indices(
    labels: &[i64],
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices, EtlError> {
    let rows = labels.len();
    let n_test = test_size(rows, test_fraction);

    if n_test == 0 || n_test >= rows {
        return Err(EtlError::InsufficientRows {
            rows,
            test_fraction,
        });
    }

    let mut by_class: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let class_sizes: Vec<(i64, usize)> = by_class.iter().map(|(k, v)| (*k, v.len())).collect();
    let test_counts = allocate(&class_sizes, rows, n_test);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut in_test = vec![false; rows];

    for (mut members, take) in by_class.into_values().zip(test_counts) {
        members.shuffle(&mut rng);
        for &i in members.iter().take(take) {
            in_test[i] = true;
        }
    }

    let (test, train): (Vec<usize>, Vec<usize>) = (0..rows).partition(|&i| in_test[i]);
    Ok(SplitIndices { train, test })
}

/// Partition a frame by its label column.
pub fn stratified_split(
    df: &DataFrame,
    label: &str,
    test_fraction: f64,
    seed: u64,
) -> Result<Split, EtlError> {
    let labels: Vec<i64> = df
        .column(label)?
        .cast(&DataType::Int64)?
        .i64()?
        .into_no_null_iter()
        .collect();

    let indices = stratified_indices(&labels, test_fraction, seed)?;

    let mut test_mask = vec![false; df.height()];
    for &i in &indices.test {
        test_mask[i] = true;
    }
    let train_mask: Vec<bool> = test_mask.iter().map(|b| !b).collect();

    let train = df.filter(&BooleanChunked::from_slice("train".into(), &train_mask))?;
    let test = df.filter(&BooleanChunked::from_slice("test".into(), &test_mask))?;

    Ok(Split { train, test })
}
