//! diabrisk: diabetes risk ETL and reporting
//!
//! The [`pipeline`] module turns the raw CSV into a validated, encoded,
//! standardized dataset and a stratified train/test split, publishing all
//! artifacts atomically. The [`analysis`] and [`report`] modules compute
//! descriptive statistics, correlations and cohort prevalence over the
//! encoded dataset and write them as JSON, CSV, text and SVG.

pub mod analysis;
pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
