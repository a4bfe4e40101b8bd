//! deptrace CLI entry point.
//!
//! Parses arguments, runs the selected check, and maps the outcome to the
//! exit-status convention: 0 target not reached, 1 target reached, 2 error.

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use deptrace::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.execute() {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}
