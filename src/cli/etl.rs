//! The `etl` subcommand

use std::time::Instant;

use anyhow::{Context, Result};
use console::style;

use crate::pipeline::{load_dataset_with_stats, publish_output, run_cleaning_pipeline, EtlConfig};
use crate::report::CleaningSummary;
use crate::utils::{
    create_spinner, display_path, finish_with_error, finish_with_success, print_completion,
    print_config, print_count, print_info, print_step_header, print_success, print_warning, CHART,
    DICE, FOLDER, SAVE,
};

/// Run the cleaning pipeline and publish its four artifacts.
pub fn run_etl_command(config: &EtlConfig) -> Result<()> {
    print_config(
        "ETL Configuration",
        &[
            (&FOLDER, "Input", display_path(&config.input)),
            (&SAVE, "Output dir", display_path(&config.output_dir)),
            (&CHART, "Test fraction", format!("{:.2}", config.test_fraction)),
            (&DICE, "Seed", config.seed.to_string()),
        ],
    );

    print_step_header(1, "Load Raw Dataset");
    let started = Instant::now();
    let spinner = create_spinner("Reading CSV...");
    let (raw, rows, cols, memory_mb) = match load_dataset_with_stats(&config.input) {
        Ok(loaded) => loaded,
        Err(e) => {
            finish_with_error(&spinner, "Load failed");
            return Err(e).with_context(|| format!("Failed to load {}", config.input.display()));
        }
    };
    finish_with_success(&spinner, "Dataset loaded");
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    print_step_header(2, "Clean, Encode, Scale and Split");
    let spinner = create_spinner("Running cleaning pipeline...");
    let output = match run_cleaning_pipeline(raw, config) {
        Ok(output) => output,
        Err(e) => {
            finish_with_error(&spinner, "Cleaning failed");
            return Err(e.into());
        }
    };
    finish_with_success(&spinner, "Cleaning pipeline complete");

    let summary = CleaningSummary::from_output(&output);
    if summary.quarantined() > 0 {
        print_count("quarantined row(s)", summary.quarantined(), Some("(see quarantine.csv)"));
    } else {
        print_info("No rows quarantined");
    }
    if summary.dropped_incomplete > 0 {
        print_warning(&format!(
            "{} row(s) with null values dropped without quarantine",
            summary.dropped_incomplete
        ));
    }
    print_info("Scaling was fit on the full dataset before the split");

    print_step_header(3, "Publish Artifacts");
    let spinner = create_spinner("Writing artifacts...");
    let written = match publish_output(&output, &config.output_dir) {
        Ok(written) => written,
        Err(e) => {
            finish_with_error(&spinner, "Nothing was published");
            return Err(e.into());
        }
    };
    finish_with_success(&spinner, &format!("Published to {}", config.output_dir.display()));
    for path in &written {
        print_success(&path.display().to_string());
    }

    summary.display();
    println!(
        "\n    {}",
        style(format!("Finished in {:.2?}", started.elapsed())).dim()
    );
    print_completion("ETL complete!");
    Ok(())
}
