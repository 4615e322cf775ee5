//! Deduplication and quarantine partitioning of raw records
//!
//! The rules run as a fixed sequence of functions, each taking the working
//! set left by the previous one:
//!
//! 1. [`deduplicate`]
//! 2. [`quarantine_invalid_gender`]
//! 3. [`quarantine_invalid_numeric`]
//! 4. [`drop_incomplete`]
//!
//! A row that fails both quarantine rules is removed by the gender rule and
//! never reaches the numeric rule, so it is quarantined exactly once.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info};

use super::schema::{CleanRecord, Gender, Record};

/// Rule that moved a record into quarantine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarantineReason {
    /// Gender missing or outside {Male, Female, Other}
    InvalidGender,
    /// age < 0 or bmi <= 0
    InvalidNumeric,
}

impl fmt::Display for QuarantineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuarantineReason::InvalidGender => write!(f, "invalid gender"),
            QuarantineReason::InvalidNumeric => write!(f, "age < 0 or bmi <= 0"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuarantinedRecord {
    pub record: Record,
    pub reason: QuarantineReason,
}

/// Result of partitioning the deduplicated records
#[derive(Debug, Clone, Default)]
pub struct CleaningOutcome {
    /// Rows read from the source
    pub input_rows: usize,
    /// Exact duplicates removed before partitioning
    pub duplicates_removed: usize,
    pub accepted: Vec<CleanRecord>,
    pub quarantined: Vec<QuarantinedRecord>,
    /// Rows with a null field, dropped without being quarantined
    pub dropped_incomplete: usize,
}

impl CleaningOutcome {
    /// Rows that entered the quarantine partition (after deduplication)
    pub fn deduplicated_rows(&self) -> usize {
        self.input_rows - self.duplicates_removed
    }

    pub fn quarantined_by(&self, reason: QuarantineReason) -> usize {
        self.quarantined.iter().filter(|q| q.reason == reason).count()
    }

    /// Quarantined rows in the raw schema, deduplicated, in quarantine order
    pub fn quarantine_records(&self) -> Vec<Record> {
        deduplicate(self.quarantined.iter().map(|q| q.record.clone()).collect())
    }
}

/// Remove exact duplicate rows, keeping the first occurrence of each.
pub fn deduplicate(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.key()))
        .collect()
}

/// Split off rows whose gender is missing or not in the valid set.
pub fn quarantine_invalid_gender(records: Vec<Record>) -> (Vec<Record>, Vec<QuarantinedRecord>) {
    let (kept, rejected): (Vec<Record>, Vec<Record>) = records
        .into_iter()
        .partition(|r| r.gender.as_deref().and_then(Gender::parse).is_some());

    (kept, tag(rejected, QuarantineReason::InvalidGender))
}

/// Split off rows with age < 0 or bmi <= 0. Null values do not match this rule.
pub fn quarantine_invalid_numeric(records: Vec<Record>) -> (Vec<Record>, Vec<QuarantinedRecord>) {
    let (rejected, kept): (Vec<Record>, Vec<Record>) =
        records.into_iter().partition(violates_numeric_rule);

    (kept, tag(rejected, QuarantineReason::InvalidNumeric))
}

fn violates_numeric_rule(record: &Record) -> bool {
    record.age.is_some_and(|age| age < 0.0) || record.bmi.is_some_and(|bmi| bmi <= 0.0)
}

/// Drop rows that still contain a null. Returns the accepted rows and the drop count.
pub fn drop_incomplete(records: Vec<Record>) -> (Vec<CleanRecord>, usize) {
    let total = records.len();
    let accepted: Vec<CleanRecord> = records.iter().filter_map(CleanRecord::from_record).collect();
    let dropped = total - accepted.len();
    (accepted, dropped)
}

fn tag(records: Vec<Record>, reason: QuarantineReason) -> Vec<QuarantinedRecord> {
    records
        .into_iter()
        .map(|record| QuarantinedRecord { record, reason })
        .collect()
}

/// Run deduplication and all partition rules in order.
pub fn partition_records(records: Vec<Record>) -> CleaningOutcome {
    let input_rows = records.len();

    let deduped = deduplicate(records);
    let duplicates_removed = input_rows - deduped.len();
    debug!(input_rows, duplicates_removed, "deduplicated raw records");

    let (working, mut quarantined) = quarantine_invalid_gender(deduped);
    let (working, invalid_numeric) = quarantine_invalid_numeric(working);
    quarantined.extend(invalid_numeric);

    let (accepted, dropped_incomplete) = drop_incomplete(working);

    info!(
        accepted = accepted.len(),
        quarantined = quarantined.len(),
        dropped_incomplete,
        "partitioned records"
    );

    CleaningOutcome {
        input_rows,
        duplicates_removed,
        accepted,
        quarantined,
        dropped_incomplete,
    }
}
