//! BOM graph construction: deduplicated direct edges, derived reverse edges,
//! cycle detection, and the transitive closure of the assembly hierarchy.
//!
//! The graph is built once per run from the full resolved edge set and never
//! mutated afterwards; every accessor is a read-only query. Nodes live in a
//! dense arena so traversal works on integer handles instead of re-hashing
//! identifier strings on hot paths.

mod arena;
mod builder;
mod closure;

pub use arena::NodeArena;
pub use builder::{GraphBuilder, GraphDiagnostics};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::{BomGraphError, Result};
use crate::model::PartId;

/// One deduplicated directed edge with its source-row occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectEdge {
    /// Parent (assembly) identifier
    pub parent: PartId,
    /// Child (component) identifier
    pub child: PartId,
    /// How many input rows produced this pair
    pub occurrences: u32,
}

/// One descendant-to-ancestor closure pair (path length >= 1).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClosurePair {
    /// The part contained somewhere below the ancestor
    pub descendant: PartId,
    /// The assembly the descendant ultimately belongs to
    pub ancestor: PartId,
}

/// Immutable directed graph over part identifiers.
#[derive(Debug, Clone)]
pub struct BomGraph {
    arena: NodeArena,
    adjacency: Vec<Vec<u32>>,
    reverse_adjacency: Vec<Vec<u32>>,
    /// (parent, child, occurrences) in first-seen order
    edges: Vec<(u32, u32, u32)>,
    diagnostics: GraphDiagnostics,
}

impl BomGraph {
    pub(super) fn from_parts(
        arena: NodeArena,
        adjacency: Vec<Vec<u32>>,
        reverse_adjacency: Vec<Vec<u32>>,
        edges: Vec<(u32, u32, u32)>,
        diagnostics: GraphDiagnostics,
    ) -> Self {
        Self {
            arena,
            adjacency,
            reverse_adjacency,
            edges,
            diagnostics,
        }
    }

    /// Number of distinct identifiers appearing in any edge.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of deduplicated direct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All node identifiers in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = &PartId> {
        self.arena.iter()
    }

    /// Construction diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &GraphDiagnostics {
        &self.diagnostics
    }

    /// Deduplicated parent-to-child edges in first-seen order.
    #[must_use]
    pub fn direct_edges(&self) -> Vec<DirectEdge> {
        self.edges
            .iter()
            .map(|&(p, c, occurrences)| DirectEdge {
                parent: self.arena.resolve(p).clone(),
                child: self.arena.resolve(c).clone(),
                occurrences,
            })
            .collect()
    }

    /// Mechanical inversion of every direct edge.
    ///
    /// Always exactly as many entries as [`direct_edges`](Self::direct_edges),
    /// occurrence counts carried over.
    #[must_use]
    pub fn reverse_edges(&self) -> Vec<DirectEdge> {
        self.edges
            .iter()
            .map(|&(p, c, occurrences)| DirectEdge {
                parent: self.arena.resolve(c).clone(),
                child: self.arena.resolve(p).clone(),
                occurrences,
            })
            .collect()
    }

    /// Direct children of a part.
    #[must_use]
    pub fn children_of(&self, id: &PartId) -> Vec<&PartId> {
        self.arena
            .index_of(id)
            .map(|idx| {
                self.adjacency[idx as usize]
                    .iter()
                    .map(|&c| self.arena.resolve(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Direct parents of a part.
    #[must_use]
    pub fn parents_of(&self, id: &PartId) -> Vec<&PartId> {
        self.arena
            .index_of(id)
            .map(|idx| {
                self.reverse_adjacency[idx as usize]
                    .iter()
                    .map(|&p| self.arena.resolve(p))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Nodes with no incoming edge (top-level assemblies).
    #[must_use]
    pub fn root_count(&self) -> usize {
        self.reverse_adjacency.iter().filter(|v| v.is_empty()).count()
    }

    /// Nodes with no outgoing edge (leaf parts).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.adjacency.iter().filter(|v| v.is_empty()).count()
    }

    /// Find one cycle, if the graph has any.
    ///
    /// The returned sequence names the full cycle with the first identifier
    /// repeated at the end: `[A, B, C, A]`.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<PartId>> {
        closure::find_cycle(&self.adjacency).map(|cycle| {
            cycle
                .into_iter()
                .map(|idx| self.arena.resolve(idx).clone())
                .collect()
        })
    }

    /// Compute the transitive closure: every (descendant, ancestor) pair
    /// reachable through one or more direct edges.
    ///
    /// A part reused under several assemblies yields one pair per distinct
    /// ancestor. Cycles are fatal here, and only here: direct and reverse
    /// edge sets stay available to the caller for inspection.
    ///
    /// Output is sorted by (descendant, ancestor) so equal inputs produce
    /// byte-equal outputs.
    pub fn transitive_closure(&self) -> Result<Vec<ClosurePair>> {
        if let Some(cycle) = self.find_cycle() {
            let named: Vec<String> = cycle.iter().map(|id| id.value().to_string()).collect();
            tracing::error!(cycle = %named.join(" -> "), "cycle blocks closure computation");
            return Err(BomGraphError::cycle(named));
        }

        let reach = closure::reachability(&self.adjacency);
        let mut pairs = Vec::new();
        for (ancestor_idx, descendants) in reach.iter().enumerate() {
            let ancestor = self.arena.resolve(ancestor_idx as u32);
            for &descendant_idx in descendants {
                pairs.push(ClosurePair {
                    descendant: self.arena.resolve(descendant_idx).clone(),
                    ancestor: ancestor.clone(),
                });
            }
        }
        pairs.sort();
        tracing::debug!(pairs = pairs.len(), "transitive closure computed");
        Ok(pairs)
    }

    /// Content hash over the deduplicated edge set (occurrences included).
    ///
    /// Edges are sorted before hashing, so two graphs built from the same
    /// resolved edge multiset hash identically regardless of insertion order.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        let mut rows: Vec<(&str, &str, u32)> = self
            .edges
            .iter()
            .map(|&(p, c, n)| {
                (
                    self.arena.resolve(p).value(),
                    self.arena.resolve(c).value(),
                    n,
                )
            })
            .collect();
        rows.sort();

        let mut hasher_input = Vec::new();
        for (parent, child, occurrences) in rows {
            hasher_input.extend(parent.as_bytes());
            hasher_input.push(0);
            hasher_input.extend(child.as_bytes());
            hasher_input.push(0);
            hasher_input.extend(occurrences.to_le_bytes());
        }
        xxh3_64(&hasher_input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolvedEdge;

    fn build(edges: &[(&str, &str)]) -> BomGraph {
        let mut builder = GraphBuilder::new();
        for (p, c) in edges {
            builder.add_edge(&ResolvedEdge::direct(p, c));
        }
        builder.finish()
    }

    #[test]
    fn test_reverse_edges_match_direct_one_to_one() {
        let graph = build(&[("A", "B"), ("B", "C"), ("B", "D")]);
        let direct = graph.direct_edges();
        let reverse = graph.reverse_edges();
        assert_eq!(direct.len(), reverse.len());
        for (d, r) in direct.iter().zip(&reverse) {
            assert_eq!(d.parent, r.child);
            assert_eq!(d.child, r.parent);
            assert_eq!(d.occurrences, r.occurrences);
        }
    }

    #[test]
    fn test_closure_covers_all_depths() {
        // Scenario C: A->B, B->C, B->D gives five pairs, not three
        let graph = build(&[("A", "B"), ("B", "C"), ("B", "D")]);
        let pairs = graph.transitive_closure().expect("acyclic");

        let expect = |d: &str, a: &str| ClosurePair {
            descendant: PartId::new(d),
            ancestor: PartId::new(a),
        };
        assert_eq!(pairs.len(), 5);
        for pair in [
            expect("B", "A"),
            expect("C", "A"),
            expect("D", "A"),
            expect("C", "B"),
            expect("D", "B"),
        ] {
            assert!(pairs.contains(&pair), "missing {pair:?}");
        }
    }

    #[test]
    fn test_closure_one_pair_per_distinct_root() {
        // Shared part under three assemblies: three pairs for the shared leaf
        let graph = build(&[("A1", "S"), ("A2", "S"), ("A3", "S")]);
        let pairs = graph.transitive_closure().expect("acyclic");
        let s = PartId::new("S");
        assert_eq!(pairs.iter().filter(|p| p.descendant == s).count(), 3);
    }

    #[test]
    fn test_cycle_fatal_for_closure_but_edges_survive() {
        // Scenario D: A->B->C->A
        let graph = build(&[("A", "B"), ("B", "C"), ("C", "A")]);

        let cycle = graph.find_cycle().expect("cycle exists");
        assert_eq!(cycle.len(), 4);
        assert_eq!(cycle.first(), cycle.last());
        let values: Vec<&str> = cycle.iter().map(PartId::value).collect();
        assert_eq!(values, vec!["A", "B", "C", "A"]);

        let err = graph.transitive_closure().expect_err("cycle is fatal");
        assert!(format!("{err}").contains("Graph computation failed"));

        // Direct and reverse edge sets are still retrievable
        assert_eq!(graph.direct_edges().len(), 3);
        assert_eq!(graph.reverse_edges().len(), 3);
    }

    #[test]
    fn test_isolated_part_produces_no_closure_pairs() {
        let graph = build(&[("A", "B")]);
        let pairs = graph.transitive_closure().expect("acyclic");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].descendant, PartId::new("B"));
    }

    #[test]
    fn test_idempotent_rebuild_same_hash() {
        let edges = [("A", "B"), ("B", "C"), ("A", "B")];
        let first = build(&edges);
        let second = build(&edges);

        assert_eq!(first.content_hash(), second.content_hash());
        assert_eq!(first.direct_edges(), second.direct_edges());
        assert_eq!(
            first.transitive_closure().expect("acyclic"),
            second.transitive_closure().expect("acyclic")
        );
    }

    #[test]
    fn test_hash_insensitive_to_insertion_order() {
        let forward = build(&[("A", "B"), ("B", "C")]);
        let backward = build(&[("B", "C"), ("A", "B")]);
        assert_eq!(forward.content_hash(), backward.content_hash());
    }

    #[test]
    fn test_roots_and_leaves() {
        let graph = build(&[("A", "B"), ("B", "C"), ("B", "D")]);
        assert_eq!(graph.root_count(), 1);
        assert_eq!(graph.leaf_count(), 2);
    }

    #[test]
    fn test_children_and_parents_queries() {
        let graph = build(&[("A", "B"), ("A", "C")]);
        let children = graph.children_of(&PartId::new("A"));
        assert_eq!(children.len(), 2);
        let parents = graph.parents_of(&PartId::new("B"));
        assert_eq!(parents, vec![&PartId::new("A")]);
        assert!(graph.children_of(&PartId::new("ZZ")).is_empty());
    }
}
