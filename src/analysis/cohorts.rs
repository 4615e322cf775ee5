//! Risk cohort prevalence table

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::frame::{column_as_f64, round_to};

/// Smoking-history levels that count as smokers
pub const SMOKER_LEVELS: [&str; 3] = ["current", "ever", "former"];

/// Membership rule of a cohort
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CohortRule {
    /// `column >= threshold`
    AtLeast {
        column: &'static str,
        threshold: f64,
    },
    /// `column == 1`
    FlagSet { column: &'static str },
    /// Any `smoking_history_<level>` indicator equals 1
    SmokingHistoryIn { levels: &'static [&'static str] },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cohort {
    pub name: &'static str,
    pub condition: &'static str,
    pub rule: CohortRule,
}

pub const COHORTS: [Cohort; 6] = [
    Cohort {
        name: "Elderly",
        condition: "age >= 60",
        rule: CohortRule::AtLeast {
            column: "age",
            threshold: 60.0,
        },
    },
    Cohort {
        name: "Overweight",
        condition: "BMI >= 30",
        rule: CohortRule::AtLeast {
            column: "bmi",
            threshold: 30.0,
        },
    },
    Cohort {
        name: "Hypertension",
        condition: "hypertension == 1",
        rule: CohortRule::FlagSet {
            column: "hypertension",
        },
    },
    Cohort {
        name: "Heart Disease",
        condition: "heart_disease == 1",
        rule: CohortRule::FlagSet {
            column: "heart_disease",
        },
    },
    Cohort {
        name: "High Glucose",
        condition: "blood_glucose_level >= 180",
        rule: CohortRule::AtLeast {
            column: "blood_glucose_level",
            threshold: 180.0,
        },
    },
    Cohort {
        name: "Smokers",
        condition: "smoking_history in {current, ever, former}",
        rule: CohortRule::SmokingHistoryIn {
            levels: &SMOKER_LEVELS,
        },
    },
];

/// One row of the cohort table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortStat {
    #[serde(rename = "Cohort")]
    pub cohort: String,
    #[serde(rename = "Condition")]
    pub condition: String,
    #[serde(rename = "N")]
    pub n: usize,
    #[serde(rename = "Diabetes %")]
    pub diabetes_pct: f64,
}

impl CohortRule {
    /// Membership mask over all rows. Nulls are never members.
    pub fn mask(&self, df: &DataFrame) -> Result<Vec<bool>> {
        match *self {
            CohortRule::AtLeast { column, threshold } => Ok(column_as_f64(df, column)?
                .into_iter()
                .map(|v| v.is_some_and(|x| x >= threshold))
                .collect()),
            CohortRule::FlagSet { column } => Ok(column_as_f64(df, column)?
                .into_iter()
                .map(|v| v == Some(1.0))
                .collect()),
            CohortRule::SmokingHistoryIn { levels } => {
                let mut mask = vec![false; df.height()];
                for level in levels {
                    let name = format!("smoking_history_{}", level);
                    // A level absent from the data (or used as the reference) has no indicator.
                    if df.column(&name).is_err() {
                        tracing::debug!(indicator = %name, "indicator column absent");
                        continue;
                    }
                    for (member, v) in mask.iter_mut().zip(column_as_f64(df, &name)?) {
                        *member |= v == Some(1.0);
                    }
                }
                Ok(mask)
            }
        }
    }
}

/// Size and label prevalence (%, 2 decimals) of each fixed cohort.
/// An empty cohort reports 0.
pub fn cohort_prevalence(df: &DataFrame, label: &str) -> Result<Vec<CohortStat>> {
    let labels = column_as_f64(df, label)?;

    COHORTS
        .iter()
        .map(|cohort| {
            let mask = cohort.rule.mask(df)?;
            let members: Vec<f64> = mask
                .iter()
                .zip(labels.iter())
                .filter(|(member, _)| **member)
                .filter_map(|(_, y)| *y)
                .collect();

            let n = mask.iter().filter(|m| **m).count();
            let diabetes_pct = if members.is_empty() {
                0.0
            } else {
                round_to(members.iter().sum::<f64>() / members.len() as f64 * 100.0, 2)
            };

            Ok(CohortStat {
                cohort: cohort.name.to_string(),
                condition: cohort.condition.to_string(),
                n,
                diabetes_pct,
            })
        })
        .collect()
}
