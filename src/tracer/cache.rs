//! Shared exploration cache for dependency traces.
//!
//! The cache records, per node, whether exploration has started, whether it
//! finished, whether the node leads to the target, and every proving edge
//! discovered so far. One cache can be threaded through nested tracers so a
//! node resolved in one branch (or one domain) is never re-explored in
//! another.

use std::collections::{HashMap, HashSet};

use crate::graph::{Edge, Node};

/// Exploration state of a visited node.
///
/// A node is `Unresolved` from the moment it is first visited until its
/// exploration completes, at which point it transitions exactly once to
/// `Resolved` with the final answer. The cycle-deferral branch of the tracer
/// matches on this explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exploration {
    /// Exploration has begun but the answer is not known yet.
    Unresolved,
    /// Exploration completed; the node does (`true`) or does not (`false`)
    /// lead to the target.
    Resolved(bool),
}

/// Memo table shared across one top-level trace and any nested sub-traces.
///
/// Mutated in place while a single trace runs to completion; create a fresh
/// cache per top-level invocation unless you are deliberately composing
/// traces across domains.
#[derive(Debug, Default)]
pub struct TraceCache {
    visited: HashMap<Node, Exploration>,
    edges: HashMap<Node, HashSet<Edge>>,
}

impl TraceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that exploration of `node` has begun.
    ///
    /// Idempotent: a node that is already visited keeps its current state,
    /// including a terminal boolean.
    pub fn visit(&mut self, node: &Node) {
        self.visited.entry(node.clone()).or_insert(Exploration::Unresolved);
    }

    /// Whether exploration of `node` has begun.
    pub fn is_visited(&self, node: &Node) -> bool {
        self.visited.contains_key(node)
    }

    /// Whether `node` has been visited and its exploration has completed.
    pub fn is_fully_explored(&self, node: &Node) -> bool {
        matches!(self.visited.get(node), Some(Exploration::Resolved(_)))
    }

    /// The terminal answer for `node`, or `None` while it is unresolved or
    /// unvisited.
    pub fn leads_to_target(&self, node: &Node) -> Option<bool> {
        match self.visited.get(node) {
            Some(Exploration::Resolved(leads)) => Some(*leads),
            _ => None,
        }
    }

    /// Set the terminal answer for `node`.
    ///
    /// Meaningful once per node per trace; a repeat from a later DFS entry
    /// recomputes the same value and is benign.
    pub fn mark_resolved(&mut self, node: &Node, leads_to_target: bool) {
        self.visited.insert(node.clone(), Exploration::Resolved(leads_to_target));
    }

    /// Record a proving edge. Duplicate edges collapse by structural equality.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.entry(edge.start.clone()).or_default().insert(edge);
    }

    /// Edges discovered so far whose start is `node`. Unordered.
    pub fn edges_from<'a>(&'a self, node: &Node) -> impl Iterator<Item = &'a Edge> {
        self.edges.get(node).into_iter().flatten()
    }

    /// Every edge reachable by following recorded edges from `node`.
    ///
    /// The edge graph itself can contain cycles even after exploration
    /// completes (both directions of a dependency cycle may have been proven
    /// before either finished), so the closure guards against re-including an
    /// edge it has already taken.
    pub fn reachable_edges(&self, node: &Node) -> HashSet<Edge> {
        let mut collected = HashSet::new();
        let mut pending = vec![node.clone()];
        while let Some(current) = pending.pop() {
            for edge in self.edges_from(&current) {
                if collected.insert(edge.clone()) {
                    pending.push(edge.end.clone());
                }
            }
        }
        collected
    }
}
