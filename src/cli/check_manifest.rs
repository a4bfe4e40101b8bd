//! The `check-manifest` command: trace a manifest to the target.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use super::{TraceStatus, print_verdict};
use crate::adapters::keys::{self, KeyDb};
use crate::adapters::manifest::{self, ManifestIndex, ManifestTracer};
use crate::adapters::package::{self, PackageIndex};
use crate::dot;
use crate::tracer::TraceCache;

/// Check whether a manifest's dependencies transitively depend on the target.
#[derive(Args, Debug)]
pub struct CheckManifestCommand {
    /// Name of the manifest to check (its `<name>` tag).
    name: String,

    /// Target package to trace to.
    #[arg(long, default_value = "python")]
    target: String,

    /// Roots to search for `package.xml` files. Repeatable; the environment
    /// form is colon-separated.
    #[arg(long = "search-path", env = "DEPTRACE_MANIFEST_PATH", value_delimiter = ':')]
    search_paths: Vec<PathBuf>,

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

impl CheckManifestCommand {
    /// Discover manifests, load the composed indexes, run the trace, report.
    pub fn execute(self, quiet: bool) -> Result<TraceStatus> {
        if self.search_paths.is_empty() {
            warn!("no search paths given; set --search-path or DEPTRACE_MANIFEST_PATH");
        }
        let manifests = ManifestIndex::discover(&self.search_paths);
        let keys = KeyDb::load(&self.keys_file)
            .with_context(|| format!("loading key database from {}", self.keys_file.display()))?;
        let packages = PackageIndex::load(&self.status_file)
            .with_context(|| format!("loading package index from {}", self.status_file.display()))?;
        let tracer = ManifestTracer::new(&manifests, &keys, &packages);
        let mut cache = TraceCache::new();

        let edges = tracer.trace_paths(&self.name, &self.target, &mut cache)?;

        if self.dot {
            let legend = package::legend().merge(keys::legend()).merge(manifest::legend());
            println!("{}", dot::render(&edges, &legend));
        } else if !quiet {
            print_verdict(&self.name, &self.target, !edges.is_empty());
        }
        Ok(TraceStatus::from_edges(&edges))
    }
}
