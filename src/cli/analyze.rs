//! The `analyze` subcommand

use anyhow::{bail, Result};
use console::style;

use crate::analysis::prevalence_display;
use crate::report::{
    display_cohorts, display_feature_summary, display_value_counts, run_report, ReportConfig,
};
use crate::utils::{
    display_path, print_completion, print_config, print_count, print_info, print_step_header,
    print_success, print_warning, CHART, FOLDER, LINK, SAVE,
};

/// Produce every report artifact; fails if any artifact could not be written.
pub fn run_analyze_command(config: &ReportConfig) -> Result<()> {
    print_config(
        "Report Configuration",
        &[
            (&FOLDER, "Input", display_path(&config.input)),
            (&SAVE, "Output dir", display_path(&config.output_dir)),
            (&SAVE, "Plots dir", display_path(&config.plots_dir)),
            (&CHART, "Histogram bins", config.histogram_bins.to_string()),
            (&LINK, "Correlation threshold", format!("{:.2}", config.multicollinearity_threshold)),
        ],
    );

    print_step_header(1, "Compute Reports");
    let outcome = run_report(config)?;
    if outcome.is_complete() {
        print_success(&format!("Analyzed {} rows", outcome.rows));
    } else {
        print_warning("Some artifacts failed");
    }

    display_feature_summary(&outcome.summary);
    display_value_counts(&outcome.indicator_counts);

    if let Some(pct) = outcome.prevalence {
        println!();
        println!(
            "    {} Diabetes prevalence: {}",
            style("✧").cyan(),
            style(prevalence_display(pct)).yellow().bold()
        );
    }

    if !outcome.correlations.is_empty() {
        println!();
        println!("    {} Correlation with diabetes:", style("✧").cyan());
        for (feature, r) in &outcome.correlations {
            println!("      {:<22} {:>7.4}", feature, r);
        }
    }

    display_cohorts(&outcome.cohorts, outcome.prevalence);

    print_step_header(2, "Multicollinearity");
    if outcome.high_correlations.is_empty() {
        print_info(&format!(
            "No high correlations (>{}) detected",
            config.multicollinearity_threshold
        ));
    } else {
        print_count(
            "correlated pair(s)",
            outcome.high_correlations.len(),
            Some(&format!("(>{:.2})", config.multicollinearity_threshold)),
        );
        for pair in &outcome.high_correlations {
            println!(
                "      {} ↔ {} (r={:.2})",
                pair.feature1, pair.feature2, pair.correlation
            );
        }
    }

    print_step_header(3, "Artifacts");
    for path in &outcome.written {
        print_success(&path.display().to_string());
    }
    for failure in &outcome.failures {
        print_warning(&format!("{}: {}", failure.artifact, failure.error));
    }

    if !outcome.is_complete() {
        bail!(
            "{} report artifact(s) failed: {}",
            outcome.failures.len(),
            outcome
                .failures
                .iter()
                .map(|f| f.artifact.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    print_completion("Report complete!");
    Ok(())
}
