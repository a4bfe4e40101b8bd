//! Graphviz DOT rendering for traced dependency paths.
//!
//! Consumes the edge set a tracer returns and produces a `digraph`
//! description: one line per distinct node annotated with its kind, one line
//! per edge annotated with its relation label. Styles come from a [`Legend`]
//! each domain contributes a fragment of. Output is sorted so it is stable
//! across runs and easy to assert on in tests.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Write as _;

use crate::graph::{Edge, Node, NodeKind};

/// Styling for rendered edges and nodes.
///
/// Maps relation labels to edge attribute lists and node kinds to node
/// attribute lists (Graphviz `attr=value` pairs, comma separated). Unknown
/// labels and kinds render unstyled.
#[derive(Debug, Default, Clone)]
pub struct Legend {
    edge_styles: HashMap<&'static str, &'static str>,
    node_styles: HashMap<NodeKind, &'static str>,
}

impl Legend {
    /// Create an empty legend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add edge styles, keyed by relation label.
    pub fn with_edges(mut self, styles: &[(&'static str, &'static str)]) -> Self {
        self.edge_styles.extend(styles.iter().copied());
        self
    }

    /// Add node styles, keyed by node kind.
    pub fn with_nodes(mut self, styles: &[(NodeKind, &'static str)]) -> Self {
        self.node_styles.extend(styles.iter().copied());
        self
    }

    /// Merge another legend in; its entries win on conflicts.
    pub fn merge(mut self, other: Legend) -> Self {
        self.edge_styles.extend(other.edge_styles);
        self.node_styles.extend(other.node_styles);
        self
    }

    fn edge_style(&self, label: &str) -> &str {
        self.edge_styles.get(label).copied().unwrap_or("")
    }

    fn node_style(&self, kind: NodeKind) -> &str {
        self.node_styles.get(&kind).copied().unwrap_or("")
    }
}

/// Render an edge set as a Graphviz digraph.
///
/// Nodes and edges with empty names are skipped. Output ordering follows the
/// structural order of nodes and edges, so identical inputs render
/// identically.
pub fn render(edges: &HashSet<Edge>, legend: &Legend) -> String {
    let mut nodes: BTreeSet<&Node> = BTreeSet::new();
    let mut lines: BTreeSet<&Edge> = BTreeSet::new();
    for edge in edges {
        if edge.start.name.is_empty() || edge.end.name.is_empty() {
            continue;
        }
        nodes.insert(&edge.start);
        nodes.insert(&edge.end);
        lines.insert(edge);
    }

    let mut out = String::from("digraph G {\n");
    for node in nodes {
        let style = legend.node_style(node.kind);
        if style.is_empty() {
            let _ = writeln!(out, "  \"{}\";  // {}", node.name, node.kind);
        } else {
            let _ = writeln!(out, "  \"{}\" [{}];  // {}", node.name, style, node.kind);
        }
    }
    for edge in lines {
        let style = legend.edge_style(&edge.label);
        if style.is_empty() {
            let _ = writeln!(
                out,
                "  \"{}\" -> \"{}\";  // {}",
                edge.start.name, edge.end.name, edge.label
            );
        } else {
            let _ = writeln!(
                out,
                "  \"{}\" -> \"{}\" [{}];  // {}",
                edge.start.name, edge.end.name, style, edge.label
            );
        }
    }
    out.push('}');
    out
}
