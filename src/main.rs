//! diabrisk: diabetes dataset ETL and risk reporting CLI

use anyhow::Result;
use clap::Parser;

use diabrisk::cli::{run_analyze_command, run_etl_command, Cli, Task};
use diabrisk::utils::print_banner;

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    print_banner(env!("CARGO_PKG_VERSION"));

    match cli.command.task() {
        Task::Etl(config) => run_etl_command(&config),
        Task::Report(config) => run_analyze_command(&config),
    }
}
