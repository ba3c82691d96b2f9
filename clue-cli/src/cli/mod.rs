//! Command-line interface orchestration for the `clue` binary.
//!
//! The `run` command loads points from a Parquet column or a comma-separated
//! text file, clusters them, and returns a per-point summary.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, ParquetArgs, RunCommand, RunSource, StrategyArg,
    TextArgs, render_summary, run_cli,
};

#[cfg(test)]
mod test_fixtures;
#[cfg(test)]
mod test_helpers;
