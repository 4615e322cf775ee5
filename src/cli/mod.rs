//! CLI module - argument parsing and the two subcommands

pub mod analyze;
pub mod args;
pub mod etl;

pub use analyze::run_analyze_command;
pub use args::{Cli, Commands, Task};
pub use etl::run_etl_command;
