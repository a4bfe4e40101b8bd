//! Domain adapters for the generic tracer.
//!
//! Each submodule owns one dependency vocabulary and plugs it into
//! [`crate::tracer::Tracer`]:
//!
//! - [`package`]: binary packages declared in a deb822 control file, with
//!   virtual packages resolved through `Provides`.
//! - [`keys`]: abstraction keys from a YAML database, each resolving to one
//!   or more binary packages.
//! - [`manifest`]: `package.xml` manifests discovered on a search path,
//!   whose non-manifest dependencies are delegated to the key domain.
//!
//! Adapters compose top-down: a manifest trace hands unknown names to the key
//! tracer, which hands resolved packages to the package tracer, all through
//! one shared [`crate::tracer::TraceCache`] so nothing is explored twice
//! across domain boundaries.

pub mod keys;
pub mod manifest;
pub mod package;

pub use keys::{KeyDb, KeyTracer};
pub use manifest::{ManifestIndex, ManifestTracer};
pub use package::{PackageIndex, PackageTracer};
