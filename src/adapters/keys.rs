//! Abstraction-key dependency domain.
//!
//! A key is an OS-agnostic name (`boost`, `python3-yaml`, ...) that a YAML
//! database resolves to one or more concrete binary packages. Tracing a key
//! means tracing each resolved package through the package domain; the key
//! itself contributes one `key`-labeled edge per resolved package that
//! reaches the target.
//!
//! The key tracer composes the package tracer as a black box: it shares the
//! caller's [`TraceCache`], so a package chain explored under one key is
//! answered from the cache when another key (or another branch of a manifest
//! trace) resolves to the same package.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::adapters::package::{PackageIndex, PackageTracer};
use crate::core::TraceError;
use crate::dot::Legend;
use crate::graph::{Edge, Node, NodeKind};
use crate::tracer::TraceCache;

/// Edge label for key-to-package resolution edges.
pub const KEY_LABEL: &str = "key";

/// A database entry: one package name or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeyEntry {
    One(String),
    Many(Vec<String>),
}

/// YAML database mapping abstraction keys to concrete package names.
#[derive(Debug, Default)]
pub struct KeyDb {
    keys: HashMap<String, Vec<String>>,
}

impl KeyDb {
    /// Load and parse a key database file.
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse key-database YAML. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, TraceError> {
        let raw: HashMap<String, KeyEntry> =
            serde_yaml::from_str(text).map_err(|source| TraceError::KeyDbParse {
                path: path.to_path_buf(),
                source,
            })?;
        let keys = raw
            .into_iter()
            .map(|(key, entry)| {
                let packages = match entry {
                    KeyEntry::One(package) => vec![package],
                    KeyEntry::Many(packages) => packages,
                };
                (key, packages)
            })
            .collect();
        Ok(Self { keys })
    }

    /// Whether `key` exists in the database.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// The packages `key` resolves to.
    pub fn resolve(&self, key: &str) -> Option<&[String]> {
        self.keys.get(key).map(Vec::as_slice)
    }
}

/// Tracer over the abstraction-key domain.
///
/// Resolves a key into packages and delegates each to a [`PackageTracer`]
/// through the shared cache.
pub struct KeyTracer<'a> {
    keys: &'a KeyDb,
    packages: &'a PackageIndex,
}

impl<'a> KeyTracer<'a> {
    /// Create a tracer over a key database and the package index its keys
    /// resolve into.
    pub fn new(keys: &'a KeyDb, packages: &'a PackageIndex) -> Self {
        Self { keys, packages }
    }

    /// Trace dependency paths from abstraction key `start` to binary package
    /// `target`.
    ///
    /// # Errors
    ///
    /// [`TraceError::NotFound`] with kind `key` when the key is unknown, or
    /// with kind `package` when a resolved package or the target is absent
    /// from the package index.
    pub fn trace_paths(
        &self,
        start: &str,
        target: &str,
        cache: &mut TraceCache,
    ) -> Result<HashSet<Edge>, TraceError> {
        let Some(resolved) = self.keys.resolve(start) else {
            return Err(TraceError::not_found(start, NodeKind::Key));
        };

        let key_node = Node::new(start, NodeKind::Key);
        if let Some(leads) = cache.leads_to_target(&key_node) {
            debug!("key '{start}' already explored, answering from cache");
            return Ok(if leads {
                cache.reachable_edges(&key_node)
            } else {
                HashSet::new()
            });
        }
        cache.visit(&key_node);

        let tracer = PackageTracer::new(self.packages);
        let mut edges = HashSet::new();
        let mut leads_to_target = false;
        for package in resolved {
            edges.extend(tracer.trace_paths(package, target, cache)?);
            let package_node = Node::new(package, NodeKind::Package);
            // Covers both a proven chain and the degenerate case where the
            // key resolves to the target itself (cache sentinel).
            if cache.leads_to_target(&package_node) == Some(true) {
                leads_to_target = true;
                let edge = Edge::new(key_node.clone(), KEY_LABEL, package_node);
                cache.add_edge(edge.clone());
                edges.insert(edge);
            }
        }
        cache.mark_resolved(&key_node, leads_to_target);
        Ok(edges)
    }
}

/// Legend fragment for key-domain edges and nodes.
pub fn legend() -> Legend {
    Legend::new()
        .with_edges(&[(KEY_LABEL, "color=orange")])
        .with_nodes(&[(NodeKind::Key, "color=orange,shape=oval")])
}
