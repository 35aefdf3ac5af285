//! Accumulates resolved edges into a [`BomGraph`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::PartId;
use crate::resolve::ResolvedEdge;

use super::arena::NodeArena;
use super::BomGraph;

/// Data-quality counters from graph construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDiagnostics {
    /// Duplicate (parent, child) pairs collapsed into an existing edge
    pub duplicate_edges: usize,
    /// Self-loop edges rejected
    pub self_loops: usize,
    /// Identifiers that appeared in a rejected self-loop, deduplicated
    pub self_loop_ids: Vec<PartId>,
}

/// Builder for a [`BomGraph`].
///
/// Collapses duplicate pairs (keeping an occurrence count for diagnostics)
/// and rejects self-loops; the finished graph is immutable.
#[derive(Debug, Default)]
#[must_use]
pub struct GraphBuilder {
    arena: NodeArena,
    adjacency: Vec<Vec<u32>>,
    occurrences: IndexMap<(u32, u32), u32>,
    diagnostics: GraphDiagnostics,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one resolved edge.
    pub fn add_edge(&mut self, edge: &ResolvedEdge) {
        self.add_pair(&edge.parent, &edge.child);
    }

    /// Add a parent/child identifier pair.
    pub fn add_pair(&mut self, parent: &PartId, child: &PartId) {
        if parent == child {
            self.diagnostics.self_loops += 1;
            if !self.diagnostics.self_loop_ids.contains(parent) {
                self.diagnostics.self_loop_ids.push(parent.clone());
            }
            tracing::debug!(id = %parent, "rejecting self-loop edge");
            return;
        }

        let p = self.intern(parent);
        let c = self.intern(child);

        match self.occurrences.get_mut(&(p, c)) {
            Some(count) => {
                *count += 1;
                self.diagnostics.duplicate_edges += 1;
            }
            None => {
                self.occurrences.insert((p, c), 1);
                self.adjacency[p as usize].push(c);
            }
        }
    }

    /// Add every edge from an iterator.
    pub fn add_edges<'e, I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = &'e ResolvedEdge>,
    {
        for edge in edges {
            self.add_edge(edge);
        }
    }

    /// Finish construction.
    pub fn finish(self) -> BomGraph {
        let mut reverse_adjacency: Vec<Vec<u32>> = vec![Vec::new(); self.arena.len()];
        let mut edges = Vec::with_capacity(self.occurrences.len());
        for (&(p, c), &count) in &self.occurrences {
            reverse_adjacency[c as usize].push(p);
            edges.push((p, c, count));
        }

        if self.diagnostics.duplicate_edges > 0 || self.diagnostics.self_loops > 0 {
            tracing::info!(
                duplicates = self.diagnostics.duplicate_edges,
                self_loops = self.diagnostics.self_loops,
                "graph construction dropped degenerate edges"
            );
        }

        BomGraph::from_parts(
            self.arena,
            self.adjacency,
            reverse_adjacency,
            edges,
            self.diagnostics,
        )
    }

    fn intern(&mut self, id: &PartId) -> u32 {
        let idx = self.arena.intern(id);
        if idx as usize >= self.adjacency.len() {
            self.adjacency.push(Vec::new());
        }
        idx
    }
}
