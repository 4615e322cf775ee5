//! Terminal summaries for the ETL and reporting runs

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::analysis::{prevalence_display, CohortStat, FeatureSummary, ValueCounts};
use crate::pipeline::{EtlOutput, QuarantineReason};

/// Row accounting of one ETL run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleaningSummary {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub quarantined_gender: usize,
    pub quarantined_numeric: usize,
    pub dropped_incomplete: usize,
    pub accepted: usize,
    pub output_columns: usize,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl CleaningSummary {
    pub fn from_output(output: &EtlOutput) -> Self {
        let cleaning = &output.cleaning;
        Self {
            input_rows: cleaning.input_rows,
            duplicates_removed: cleaning.duplicates_removed,
            quarantined_gender: cleaning.quarantined_by(QuarantineReason::InvalidGender),
            quarantined_numeric: cleaning.quarantined_by(QuarantineReason::InvalidNumeric),
            dropped_incomplete: cleaning.dropped_incomplete,
            accepted: cleaning.accepted.len(),
            output_columns: output.encoded.width(),
            train_rows: output.train.height(),
            test_rows: output.test.height(),
        }
    }

    pub fn quarantined(&self) -> usize {
        self.quarantined_gender + self.quarantined_numeric
    }

    pub fn display(&self) {
        print_section_title("📋", "CLEANING SUMMARY");

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Rows").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Input"), Cell::new(self.input_rows)]);
        table.add_row(vec![
            Cell::new("🧬 Duplicates Removed"),
            count_cell(self.duplicates_removed, Color::Yellow),
        ]);
        table.add_row(vec![
            Cell::new("🚫 Quarantined (gender)"),
            count_cell(self.quarantined_gender, Color::Red),
        ]);
        table.add_row(vec![
            Cell::new("🚫 Quarantined (age/bmi)"),
            count_cell(self.quarantined_numeric, Color::Red),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Dropped (nulls)"),
            count_cell(self.dropped_incomplete, Color::Yellow),
        ]);
        table.add_row(vec![
            Cell::new("✅ Accepted"),
            Cell::new(self.accepted)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![Cell::new("🔢 Encoded Columns"), Cell::new(self.output_columns)]);
        table.add_row(vec![Cell::new("🏋️ Train"), Cell::new(self.train_rows)]);
        table.add_row(vec![Cell::new("🧪 Test"), Cell::new(self.test_rows)]);

        print_indented(&table);
    }
}

fn count_cell(count: usize, highlight: Color) -> Cell {
    Cell::new(count).fg(if count == 0 { Color::White } else { highlight })
}

fn print_section_title(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn stat_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(format!("{:.2}", v)).set_alignment(CellAlignment::Right),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

/// Feature-indexed table of the numeric summary statistics
pub fn display_feature_summary(summary: &[FeatureSummary]) {
    print_section_title("📊", "SUMMARY STATISTICS");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        ["Feature", "mean", "std", "min", "median", "max", "% missing"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for row in summary {
        table.add_row(vec![
            Cell::new(&row.feature),
            stat_cell(row.mean),
            stat_cell(row.std),
            stat_cell(row.min),
            stat_cell(row.median),
            stat_cell(row.max),
            stat_cell(Some(row.pct_missing)),
        ]);
    }

    print_indented(&table);
}

pub fn display_value_counts(counts: &[ValueCounts]) {
    print_section_title("🔠", "CATEGORICAL DISTRIBUTION");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Indicator").add_attribute(Attribute::Bold),
        Cell::new("0").add_attribute(Attribute::Bold),
        Cell::new("1").add_attribute(Attribute::Bold),
    ]);

    for vc in counts {
        let count_of = |value: i64| {
            vc.counts
                .iter()
                .find(|(k, _)| *k == value)
                .map_or(0, |(_, n)| *n)
        };
        table.add_row(vec![
            Cell::new(&vc.column),
            Cell::new(count_of(0)),
            Cell::new(count_of(1)),
        ]);
    }

    print_indented(&table);
}

/// Cohort table, highlighting cohorts above the overall prevalence
pub fn display_cohorts(cohorts: &[CohortStat], overall_pct: Option<f64>) {
    print_section_title("🎯", "RISK GROUPS");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Cohort").add_attribute(Attribute::Bold),
        Cell::new("Condition").add_attribute(Attribute::Bold),
        Cell::new("N").add_attribute(Attribute::Bold),
        Cell::new("Diabetes %").add_attribute(Attribute::Bold),
    ]);

    for stat in cohorts {
        let elevated = overall_pct.is_some_and(|overall| stat.diabetes_pct > overall);
        table.add_row(vec![
            Cell::new(&stat.cohort),
            Cell::new(&stat.condition).fg(Color::DarkGrey),
            Cell::new(stat.n),
            Cell::new(prevalence_display(stat.diabetes_pct)).fg(if elevated {
                Color::Red
            } else {
                Color::Green
            }),
        ]);
    }

    print_indented(&table);
}
