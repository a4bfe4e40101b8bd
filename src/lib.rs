//! deptrace - trace dependency paths to a target package.
//!
//! deptrace answers one question across several package ecosystems: does X
//! transitively depend on Y? When it does, the answer comes with proof:
//! every dependency edge lying on a path from X to Y, ready to render as a
//! Graphviz graph.
//!
//! # Architecture
//!
//! The crate is one generic graph algorithm plus thin domain adapters:
//!
//! - [`graph`]: named, kind-tagged nodes and labeled directed edges. Kinds
//!   (`package`, `virtual`, `key`, `manifest`) namespace node identity so
//!   domains can share a graph without colliding.
//! - [`tracer`]: the core, a depth-first search over a lazily-discovered,
//!   possibly cyclic dependency graph, memoized in a [`tracer::TraceCache`].
//!   Cycles are handled by deferring the blocked node and re-tracing it in
//!   fixed-point passes once the cache has more answers. Domains plug in via
//!   the [`tracer::DependencyAdapter`] trait.
//! - [`adapters`]: the three domains: binary packages from a deb822 control
//!   file (with virtual packages via `Provides`), abstraction keys from a
//!   YAML database, and `package.xml` manifests discovered on a search path.
//!   Higher domains delegate to lower ones through a shared cache, so one
//!   trace never explores the same node twice even across domains.
//! - [`dot`]: renders a traced edge set as a DOT digraph with per-relation
//!   and per-kind styling.
//! - [`cli`]: `check-package`, `check-key` and `check-manifest`
//!   subcommands. Exit status: 0 target not reached, 1 target reached,
//!   2 lookup or data-source error.
//!
//! # Example
//!
//! ```no_run
//! use deptrace::adapters::package::{PackageIndex, PackageTracer};
//! use deptrace::tracer::TraceCache;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), deptrace::core::TraceError> {
//! let index = PackageIndex::load(Path::new("/var/lib/dpkg/status"))?;
//! let tracer = PackageTracer::new(&index);
//! let mut cache = TraceCache::new();
//! let edges = tracer.trace_paths("curl", "libssl3", &mut cache)?;
//! if edges.is_empty() {
//!     println!("curl does not depend on libssl3");
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod core;
pub mod dot;
pub mod graph;
pub mod tracer;
