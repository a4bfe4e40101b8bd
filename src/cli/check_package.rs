//! The `check-package` command: trace a binary package to the target.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::{TraceStatus, print_verdict};
use crate::adapters::package::{self, PackageIndex, PackageTracer};
use crate::dot;
use crate::tracer::TraceCache;

/// Check whether a binary package transitively depends on the target.
#[derive(Args, Debug)]
pub struct CheckPackageCommand {
    /// Package whose dependency closure is searched.
    package: String,

    /// Target package to trace to.
    #[arg(long, default_value = "python")]
    target: String,

    /// deb822 control file backing the package index.
    #[arg(long, env = "DEPTRACE_STATUS_FILE", default_value = "/var/lib/dpkg/status")]
    status_file: PathBuf,

    /// Print the proving paths as a Graphviz DOT graph instead of a verdict.
    #[arg(long)]
    dot: bool,
}

impl CheckPackageCommand {
    /// Load the index, run the trace, and report.
    pub fn execute(self, quiet: bool) -> Result<TraceStatus> {
        let index = PackageIndex::load(&self.status_file)
            .with_context(|| format!("loading package index from {}", self.status_file.display()))?;
        let tracer = PackageTracer::new(&index);
        let mut cache = TraceCache::new();

        let edges = tracer.trace_paths(&self.package, &self.target, &mut cache)?;

        if self.dot {
            println!("{}", dot::render(&edges, &package::legend()));
        } else if !quiet {
            print_verdict(&self.package, &self.target, !edges.is_empty());
        }
        Ok(TraceStatus::from_edges(&edges))
    }
}
