//! Node and edge model for dependency graphs.
//!
//! Every domain the tracer walks (binary packages, abstraction keys, manifest
//! packages) is expressed with the same two types: a [`Node`] identified by a
//! name and a [`NodeKind`], and a labeled directed [`Edge`] between two nodes.
//! Equality and hashing are purely structural, so both types can be used as
//! cache keys and collected into sets without extra bookkeeping.
//!
//! Kinds namespace the graph: a manifest named `python` and a binary package
//! named `python` are distinct vertices, which keeps composed traces that
//! share one cache from conflating nodes across domains.

use std::fmt;

/// The domain a node belongs to.
///
/// Kinds are part of node identity. The same textual name under two different
/// kinds is two different vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// A concrete binary package from the package index.
    Package,
    /// A virtual package name satisfied by one or more providing packages.
    VirtualPackage,
    /// An abstraction key that resolves to concrete packages.
    Key,
    /// A manifest (source package) discovered on the search path.
    Manifest,
}

impl NodeKind {
    /// Short lowercase label used in rendered output and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::VirtualPackage => "virtual",
            Self::Key => "key",
            Self::Manifest => "manifest",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vertex in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    /// Name as it appears in the underlying metadata.
    pub name: String,
    /// Domain the name belongs to.
    pub kind: NodeKind,
}

impl Node {
    /// Create a new node. Construction is pure; nodes are immutable.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// A labeled directed connection between two nodes.
///
/// The label names the dependency relation that produced the edge (for
/// example `Depends`, `virtual`, `key`, `build_depend`). Edges are the unit
/// of path reconstruction; equal edges discovered on different exploration
/// passes collapse to one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    /// Node the dependency is declared on.
    pub start: Node,
    /// Relation type that produced this edge.
    pub label: String,
    /// Node the dependency points at.
    pub end: Node,
}

impl Edge {
    /// Create a new edge.
    pub fn new(start: Node, label: impl Into<String>, end: Node) -> Self {
        Self {
            start,
            label: label.into(),
            end,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -{}-> {}", self.start.name, self.label, self.end.name)
    }
}
