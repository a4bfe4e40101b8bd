//! Command-line interface for deptrace.
//!
//! One subcommand per dependency domain, all answering the same question
//! (does the thing named on the command line transitively depend on the
//! target package?) and all observing the same exit-status convention:
//!
//! | status | meaning                                            |
//! |--------|----------------------------------------------------|
//! | 0      | target not reached                                 |
//! | 1      | target reached (the undesirable finding)           |
//! | 2      | lookup or data-source error                        |
//!
//! # Commands
//!
//! - `check-package`: trace a binary package through the package index.
//! - `check-key`: resolve an abstraction key and trace each resolved
//!   package.
//! - `check-manifest`: trace a discovered `package.xml` manifest, crossing
//!   into the key and package domains as needed.
//!
//! Every command prints either a one-line verdict or, with `--dot`, a
//! Graphviz digraph of the proving paths.

mod check_key;
mod check_manifest;
mod check_package;

use std::collections::HashSet;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::graph::Edge;

pub use check_key::CheckKeyCommand;
pub use check_manifest::CheckManifestCommand;
pub use check_package::CheckPackageCommand;

/// Outcome of a check, as seen by the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStatus {
    /// No dependency path to the target was found.
    Clean,
    /// At least one dependency path reaches the target.
    ReachesTarget,
}

impl TraceStatus {
    /// Derive the status from a returned edge set.
    pub fn from_edges(edges: &HashSet<Edge>) -> Self {
        if edges.is_empty() {
            Self::Clean
        } else {
            Self::ReachesTarget
        }
    }

    /// Exit status for this outcome.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::ReachesTarget => 1,
        }
    }
}

/// Top-level CLI.
#[derive(Parser)]
#[command(
    name = "deptrace",
    about = "Trace whether a package, key, or manifest depends on a target package",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress the verdict line and warnings; only errors are printed.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a binary package depends on the target.
    CheckPackage(CheckPackageCommand),

    /// Check whether an abstraction key depends on the target.
    CheckKey(CheckKeyCommand),

    /// Check whether a manifest's dependencies depend on the target.
    CheckManifest(CheckManifestCommand),
}

impl Cli {
    /// Run the selected command.
    ///
    /// Logging is initialized here so every command shares the same
    /// verbosity mapping.
    pub fn execute(self) -> Result<TraceStatus> {
        init_logging(self.verbose, self.quiet);
        match self.command {
            Commands::CheckPackage(cmd) => cmd.execute(self.quiet),
            Commands::CheckKey(cmd) => cmd.execute(self.quiet),
            Commands::CheckManifest(cmd) => cmd.execute(self.quiet),
        }
    }
}

/// Install the global tracing subscriber.
///
/// `--verbose` forces debug level, `--quiet` drops to errors only; otherwise
/// `RUST_LOG` is honored, defaulting to warnings. Logs go to stderr so DOT
/// output on stdout stays parseable.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("warn")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Print the human-readable verdict line.
fn print_verdict(start: &str, target: &str, reaches: bool) {
    if reaches {
        println!("{start} {} on {target}", "depends".red().bold());
    } else {
        println!("{start} {} on {target}", "does not depend".green().bold());
    }
}
