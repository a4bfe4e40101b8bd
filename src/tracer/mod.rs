//! Generic dependency-path tracer.
//!
//! This module answers one question: does `start` transitively depend on
//! `target`? If it does, the tracer returns every edge that lies on some
//! proving path. The same algorithm serves every domain in the crate; a
//! domain plugs in by implementing [`DependencyAdapter`], which tells the
//! tracer how to enumerate a node's direct dependency candidates and how to
//! resolve virtual references into concrete providers.
//!
//! # Algorithm
//!
//! The trace is a depth-first search over a lazily-discovered, possibly
//! cyclic graph, memoized through a [`TraceCache`]:
//!
//! 1. A node whose name equals the target is trivially a hit.
//! 2. A fully-explored node answers from the cache; when the answer is yes,
//!    its already-proven edges are merged into the result.
//! 3. A node that is visited but still unresolved is being explored higher up
//!    the call stack, which means a cycle. The search does not recurse; the node is
//!    *deferred* and conservatively answered `false` for this pass.
//! 4. Otherwise the node's candidates are enumerated through the adapter.
//!    Virtual references fan out into their providers; names the adapter does
//!    not know are either delegated to a nested tracer
//!    ([`DependencyAdapter::trace_external`]) or skipped with a warning.
//! 5. After the first full pass, every node deferred by a cycle is re-traced
//!    against the now-more-complete cache, repeating until a pass defers
//!    nothing new. The visited set only grows, so this fixed point is
//!    reached quickly; extra passes cost nothing when the graph is acyclic.
//!
//! Deferral instead of up-front strongly-connected-component analysis is
//! intentional: adapters are backed by external databases where enumeration
//! is not free, so the extra passes are only paid when cycles actually occur.
//!
//! The cache is threaded in by the caller, which lets composed traces (a
//! manifest trace delegating to a key trace delegating to a package trace)
//! share exploration state across domains. Node kinds keep the shared cache
//! from conflating same-named nodes from different domains.

pub mod cache;

use std::collections::HashSet;
use std::mem;

use tracing::{debug, warn};

use crate::core::TraceError;
use crate::graph::{Edge, Node, NodeKind};

pub use cache::{Exploration, TraceCache};

/// Edge label used for virtual-reference resolution edges.
pub const VIRTUAL_LABEL: &str = "virtual";

/// One direct dependency candidate: a name plus the relation that declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Name of the depended-on thing, as declared.
    pub name: String,
    /// Relation type, used as the edge label (e.g. `Depends`, `exec_depend`).
    pub label: String,
}

impl Candidate {
    /// Create a candidate.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Capability interface a domain supplies to the generic tracer.
///
/// Implementations are plain structs over an in-memory index. All methods are
/// queries; the tracer owns every mutation of the shared cache except inside
/// [`trace_external`](Self::trace_external), where a nested tracer may record
/// its own exploration.
pub trait DependencyAdapter {
    /// Kind assigned to concrete nodes of this domain.
    fn kind(&self) -> NodeKind;

    /// Whether `name` is a concrete entry in this domain's index.
    fn contains(&self, name: &str) -> bool;

    /// Validate the start of a trace. Default: must be in the index.
    fn resolve_start(&self, name: &str) -> Result<(), TraceError> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(TraceError::not_found(name, self.kind()))
        }
    }

    /// Validate the target of a trace. Default: must be in the index.
    ///
    /// Domains whose targets live in a different index (a manifest trace
    /// targets a binary package) override this.
    fn resolve_target(&self, name: &str) -> Result<(), TraceError> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(TraceError::not_found(name, self.kind()))
        }
    }

    /// Direct dependency candidates of `name`, restricted to forward
    /// relations (ones that genuinely propagate toward the target; never
    /// conflict/replacement relations). Alternatives within one declaration
    /// are flattened into separate candidates.
    fn direct_dependencies(&self, name: &str) -> Vec<Candidate>;

    /// Whether `name` is a virtual reference satisfied by providers rather
    /// than a concrete entry.
    fn is_virtual(&self, _name: &str) -> bool {
        false
    }

    /// Concrete entries that satisfy the virtual reference `name`.
    fn providers(&self, _name: &str) -> Vec<String> {
        Vec::new()
    }

    /// Hand a candidate this domain cannot resolve to a nested tracer.
    ///
    /// Returns the node the candidate resolved to in the foreign domain and
    /// whether it leads to the target, or `None` when the name is unknown
    /// there too (the tracer then skips it with a warning). The nested tracer
    /// records its edges in the shared `cache`.
    fn trace_external(
        &self,
        _name: &str,
        _target: &str,
        _cache: &mut TraceCache,
    ) -> Result<Option<(Node, bool)>, TraceError> {
        Ok(None)
    }
}

/// Mutable state of one `trace_paths` invocation.
struct TraceRun<'c> {
    target: String,
    cache: &'c mut TraceCache,
    deferred: HashSet<String>,
    edges: HashSet<Edge>,
}

/// Generic depth-first dependency tracer over one adapter.
pub struct Tracer<'a, A: DependencyAdapter> {
    adapter: &'a A,
}

impl<'a, A: DependencyAdapter> Tracer<'a, A> {
    /// Create a tracer over `adapter`.
    pub fn new(adapter: &'a A) -> Self {
        Self { adapter }
    }

    /// Trace every dependency path from `start` to `target`.
    ///
    /// Returns the deduplicated set of edges proving reachability; an empty
    /// set means no path was found. The degenerate `start == target` trace
    /// records the start node as leading to the target (with no edge to
    /// prove it) and returns an empty set.
    ///
    /// # Errors
    ///
    /// [`TraceError::NotFound`] when `start` or `target` fails to resolve in
    /// the adapter's index.
    pub fn trace_paths(
        &self,
        start: &str,
        target: &str,
        cache: &mut TraceCache,
    ) -> Result<HashSet<Edge>, TraceError> {
        self.adapter.resolve_start(start)?;
        self.adapter.resolve_target(target)?;

        if start == target {
            // Sentinel: the target is the start itself, no edge needed.
            let node = Node::new(start, self.adapter.kind());
            cache.visit(&node);
            cache.mark_resolved(&node, true);
            return Ok(HashSet::new());
        }

        let mut run = TraceRun {
            target: target.to_string(),
            cache,
            deferred: HashSet::new(),
            edges: HashSet::new(),
        };

        self.trace_node(start, &mut run)?;

        // Nodes cut short by cycles get extra passes against the
        // now-more-complete cache until a pass defers nothing new.
        while !run.deferred.is_empty() {
            let deferred = mem::take(&mut run.deferred);
            debug!(count = deferred.len(), "re-tracing deferred nodes");
            for name in deferred {
                self.trace_node(&name, &mut run)?;
            }
        }

        Ok(run.edges)
    }

    /// Depth-first search from one node. Returns whether it leads to the
    /// target.
    fn trace_node(&self, name: &str, run: &mut TraceRun<'_>) -> Result<bool, TraceError> {
        if name == run.target {
            return Ok(true);
        }

        let node = Node::new(name, self.adapter.kind());
        if run.cache.is_visited(&node) {
            if run.cache.is_fully_explored(&node) {
                let leads = run.cache.leads_to_target(&node) == Some(true);
                if leads {
                    run.edges.extend(run.cache.reachable_edges(&node));
                }
                return Ok(leads);
            }
            // Mid-exploration hit: a cycle. Answer false for now and let a
            // later pass decide.
            run.deferred.insert(name.to_string());
            return Ok(false);
        }
        run.cache.visit(&node);

        let mut leads_to_target = false;
        for candidate in self.adapter.direct_dependencies(name) {
            if self.adapter.is_virtual(&candidate.name) {
                let reference = Node::new(&candidate.name, NodeKind::VirtualPackage);
                let mut reference_leads = false;
                for provider in self.adapter.providers(&candidate.name) {
                    if self.trace_node(&provider, run)? {
                        leads_to_target = true;
                        reference_leads = true;
                        let to_reference =
                            Edge::new(node.clone(), &candidate.label, reference.clone());
                        let to_provider = Edge::new(
                            reference.clone(),
                            VIRTUAL_LABEL,
                            Node::new(&provider, self.adapter.kind()),
                        );
                        run.edges.insert(to_reference.clone());
                        run.edges.insert(to_provider.clone());
                        run.cache.add_edge(to_reference);
                        run.cache.add_edge(to_provider);
                    }
                }
                run.cache.mark_resolved(&reference, reference_leads);
            } else if self.adapter.contains(&candidate.name) {
                if self.trace_node(&candidate.name, run)? {
                    leads_to_target = true;
                    let edge = Edge::new(
                        node.clone(),
                        &candidate.label,
                        Node::new(&candidate.name, self.adapter.kind()),
                    );
                    run.edges.insert(edge.clone());
                    run.cache.add_edge(edge);
                }
            } else if let Some((foreign, foreign_leads)) =
                self.adapter
                    .trace_external(&candidate.name, &run.target, run.cache)?
            {
                if foreign_leads {
                    leads_to_target = true;
                    let edge = Edge::new(node.clone(), &candidate.label, foreign.clone());
                    run.edges.insert(edge.clone());
                    run.cache.add_edge(edge);
                    run.edges.extend(run.cache.reachable_edges(&foreign));
                }
            } else {
                // Incomplete metadata degrades the search, it does not abort.
                warn!(
                    "'{}' not in the {} index (used by '{}' as {}), skipping",
                    candidate.name,
                    self.adapter.kind(),
                    name,
                    candidate.label
                );
            }
        }

        run.cache.mark_resolved(&node, leads_to_target);
        Ok(leads_to_target)
    }
}
