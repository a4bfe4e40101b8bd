//! The `check-key` command: trace an abstraction key to the target.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::{TraceStatus, print_verdict};
use crate::adapters::keys::{self, KeyDb, KeyTracer};
use crate::adapters::package::{self, PackageIndex};
use crate::dot;
use crate::tracer::TraceCache;

/// Check whether an abstraction key transitively depends on the target.
#[derive(Args, Debug)]
pub struct CheckKeyCommand {
    /// Key whose resolved packages are searched.
    key: String,

    /// Target package to trace to.
    #[arg(long, default_value = "python")]
    target: String,

    /// YAML database resolving keys to package names.
    #[arg(long, env = "DEPTRACE_KEYS_FILE")]
    keys_file: PathBuf,

    /// deb822 control file backing the package index.
    #[arg(long, env = "DEPTRACE_STATUS_FILE", default_value = "/var/lib/dpkg/status")]
    status_file: PathBuf,

    /// Print the proving paths as a Graphviz DOT graph instead of a verdict.
    #[arg(long)]
    dot: bool,
}

impl CheckKeyCommand {
    /// Load the indexes, run the composed trace, and report.
    pub fn execute(self, quiet: bool) -> Result<TraceStatus> {
        let keys = KeyDb::load(&self.keys_file)
            .with_context(|| format!("loading key database from {}", self.keys_file.display()))?;
        let packages = PackageIndex::load(&self.status_file)
            .with_context(|| format!("loading package index from {}", self.status_file.display()))?;
        let tracer = KeyTracer::new(&keys, &packages);
        let mut cache = TraceCache::new();

        let edges = tracer.trace_paths(&self.key, &self.target, &mut cache)?;

        if self.dot {
            let legend = package::legend().merge(keys::legend());
            println!("{}", dot::render(&edges, &legend));
        } else if !quiet {
            print_verdict(&self.key, &self.target, !edges.is_empty());
        }
        Ok(TraceStatus::from_edges(&edges))
    }
}
