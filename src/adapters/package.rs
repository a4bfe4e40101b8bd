//! Binary-package dependency domain.
//!
//! The index is loaded from a deb822-style control file (by default the dpkg
//! status database): stanzas separated by blank lines, `Field: value` lines,
//! indented continuation lines. Only the fields the tracer needs are kept:
//! the package name, its forward dependency relations, and the virtual names
//! it `Provides`.
//!
//! Forward relations are `Depends`, `Pre-Depends`, `Recommends` and
//! `Suggests`. Reverse and conflict relations (`Breaks`, `Conflicts`,
//! `Replaces`, ...) never propagate a constraint toward the target and are
//! not enumerated at all. Within one declaration, alternatives (`a | b`) are
//! flattened into separate candidates, since any of them can satisfy the
//! dependency; version constraints, architecture qualifiers and build
//! profiles are stripped down to the bare package name.

use std::collections::HashMap;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::core::TraceError;
use crate::dot::Legend;
use crate::graph::{Edge, NodeKind};
use crate::tracer::{Candidate, DependencyAdapter, TraceCache, Tracer, VIRTUAL_LABEL};

/// Relation fields that propagate toward the target, in stanza order.
const FORWARD_RELATIONS: [&str; 4] = ["Depends", "Pre-Depends", "Recommends", "Suggests"];

/// One package stanza reduced to what the tracer needs.
#[derive(Debug)]
struct PackageRecord {
    /// Flattened forward dependency candidates, one per alternative.
    dependencies: Vec<Candidate>,
}

/// In-memory index over a control file.
#[derive(Debug, Default)]
pub struct PackageIndex {
    packages: HashMap<String, PackageRecord>,
    /// Virtual name -> real packages that provide it, in file order.
    providers: HashMap<String, Vec<String>>,
}

impl PackageIndex {
    /// Load and parse a control file.
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse control-file text. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, TraceError> {
        let mut index = Self::default();
        for stanza in split_stanzas(text) {
            let fields = parse_stanza(&stanza, path)?;
            let Some(name) = fields.get("Package") else {
                return Err(TraceError::ControlParse {
                    path: path.to_path_buf(),
                    reason: "stanza without a Package field".to_string(),
                });
            };

            let mut dependencies = Vec::new();
            for relation in FORWARD_RELATIONS {
                if let Some(value) = fields.get(relation) {
                    for group in value.split(',') {
                        for alternative in group.split('|') {
                            if let Some(dep) = relation_name(alternative) {
                                dependencies.push(Candidate::new(dep, relation));
                            }
                        }
                    }
                }
            }

            if let Some(provides) = fields.get("Provides") {
                for provided in provides.split(',') {
                    if let Some(virtual_name) = relation_name(provided) {
                        index
                            .providers
                            .entry(virtual_name.to_string())
                            .or_default()
                            .push(name.clone());
                    }
                }
            }

            index.packages.insert(name.clone(), PackageRecord { dependencies });
        }
        Ok(index)
    }

    /// Whether `name` is a real package in the index.
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Whether `name` is satisfied only by providing packages.
    ///
    /// A name that exists as a real package is never virtual, even if other
    /// packages also provide it.
    pub fn is_virtual(&self, name: &str) -> bool {
        !self.contains(name) && self.providers.contains_key(name)
    }

    /// Real packages providing the virtual `name`.
    pub fn providers(&self, name: &str) -> Vec<String> {
        self.providers.get(name).cloned().unwrap_or_default()
    }

    /// Number of real packages in the index.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the index holds no packages at all.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl DependencyAdapter for PackageIndex {
    fn kind(&self) -> NodeKind {
        NodeKind::Package
    }

    fn contains(&self, name: &str) -> bool {
        PackageIndex::contains(self, name)
    }

    fn direct_dependencies(&self, name: &str) -> Vec<Candidate> {
        self.packages.get(name).map(|record| record.dependencies.clone()).unwrap_or_default()
    }

    fn is_virtual(&self, name: &str) -> bool {
        PackageIndex::is_virtual(self, name)
    }

    fn providers(&self, name: &str) -> Vec<String> {
        PackageIndex::providers(self, name)
    }
}

/// Tracer over the binary-package domain.
pub struct PackageTracer<'a> {
    index: &'a PackageIndex,
}

impl<'a> PackageTracer<'a> {
    /// Create a tracer over `index`.
    pub fn new(index: &'a PackageIndex) -> Self {
        Self { index }
    }

    /// Trace dependency paths from package `start` to package `target`.
    ///
    /// # Errors
    ///
    /// [`TraceError::NotFound`] when either name is absent from the index.
    pub fn trace_paths(
        &self,
        start: &str,
        target: &str,
        cache: &mut TraceCache,
    ) -> Result<HashSet<Edge>, TraceError> {
        Tracer::new(self.index).trace_paths(start, target, cache)
    }
}

/// Legend fragment for package-domain edges.
pub fn legend() -> Legend {
    Legend::new().with_edges(&[
        ("Depends", "color=blue"),
        ("Pre-Depends", "color=blue"),
        ("Recommends", "color=yellow"),
        ("Suggests", "color=yellow"),
        (VIRTUAL_LABEL, "color=green"),
    ])
}

/// Split control-file text into stanzas at blank lines.
fn split_stanzas(text: &str) -> Vec<Vec<String>> {
    let mut stanzas = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                stanzas.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.to_string());
        }
    }
    if !current.is_empty() {
        stanzas.push(current);
    }
    stanzas
}

/// Parse one stanza into a field map, folding continuation lines into the
/// preceding field.
fn parse_stanza(lines: &[String], path: &Path) -> Result<HashMap<String, String>, TraceError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut last_field: Option<String> = None;
    for line in lines {
        if line.starts_with(' ') || line.starts_with('\t') {
            let value = last_field.as_ref().and_then(|field| fields.get_mut(field));
            let Some(value) = value else {
                return Err(TraceError::ControlParse {
                    path: path.to_path_buf(),
                    reason: format!("continuation line with no preceding field: {line:?}"),
                });
            };
            value.push(' ');
            value.push_str(line.trim());
        } else if let Some((field, value)) = line.split_once(':') {
            let field = field.trim().to_string();
            fields.insert(field.clone(), value.trim().to_string());
            last_field = Some(field);
        } else {
            return Err(TraceError::ControlParse {
                path: path.to_path_buf(),
                reason: format!("line is neither a field nor a continuation: {line:?}"),
            });
        }
    }
    Ok(fields)
}

/// Reduce one relation alternative to its bare package name.
///
/// Strips version constraints `(...)`, architecture qualifiers `:any`, arch
/// lists `[...]` and build profiles `<...>`. Returns `None` for an empty
/// alternative.
fn relation_name(alternative: &str) -> Option<String> {
    let name: String = alternative
        .trim()
        .chars()
        .take_while(|c| !c.is_whitespace() && !matches!(c, '(' | '[' | '<' | ':'))
        .collect();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
