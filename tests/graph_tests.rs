//! Integration tests for BOM graph construction and closure computation.

use bom_graph_tools::graph::{ClosurePair, GraphBuilder};
use bom_graph_tools::model::PartId;
use bom_graph_tools::resolve::ResolvedEdge;

/// Helper to build a graph from identifier pairs.
fn make_graph(edges: &[(&str, &str)]) -> bom_graph_tools::graph::BomGraph {
    let mut builder = GraphBuilder::new();
    for (parent, child) in edges {
        builder.add_edge(&ResolvedEdge::direct(parent, child));
    }
    builder.finish()
}

fn pair(descendant: &str, ancestor: &str) -> ClosurePair {
    ClosurePair {
        descendant: PartId::new(descendant),
        ancestor: PartId::new(ancestor),
    }
}

#[test]
fn scenario_c_closure_covers_every_level() {
    // A->B, B->C, B->D: five pairs, not three
    let graph = make_graph(&[("A", "B"), ("B", "C"), ("B", "D")]);
    let pairs = graph.transitive_closure().expect("acyclic");

    let expected = [
        pair("B", "A"),
        pair("C", "A"),
        pair("D", "A"),
        pair("C", "B"),
        pair("D", "B"),
    ];
    assert_eq!(pairs.len(), 5);
    for expect in &expected {
        assert!(pairs.contains(expect), "missing {expect:?}");
    }
}

#[test]
fn scenario_d_cycle_error_names_the_cycle() {
    // A->B, B->C, C->A: closure fails naming [A, B, C, A]; direct and
    // reverse sets stay retrievable
    let graph = make_graph(&[("A", "B"), ("B", "C"), ("C", "A")]);

    let cycle = graph.find_cycle().expect("cycle present");
    let names: Vec<&str> = cycle.iter().map(PartId::value).collect();
    assert_eq!(names, vec!["A", "B", "C", "A"]);

    assert!(graph.transitive_closure().is_err());
    assert_eq!(graph.direct_edges().len(), 3);
    assert_eq!(graph.reverse_edges().len(), 3);
}

#[test]
fn reverse_round_trip_law() {
    let graph = make_graph(&[("A", "B"), ("B", "C"), ("A", "C"), ("X", "Y")]);
    let direct = graph.direct_edges();
    let reverse = graph.reverse_edges();

    assert_eq!(direct.len(), reverse.len());

    // Reversing twice yields the original set
    let double_reversed: Vec<_> = reverse
        .iter()
        .map(|e| (e.child.clone(), e.parent.clone(), e.occurrences))
        .collect();
    let original: Vec<_> = direct
        .iter()
        .map(|e| (e.parent.clone(), e.child.clone(), e.occurrences))
        .collect();
    assert_eq!(double_reversed, original);
}

#[test]
fn builder_is_idempotent() {
    let edges = [("A", "B"), ("B", "C"), ("A", "B"), ("C", "D")];
    let first = make_graph(&edges);
    let second = make_graph(&edges);

    assert_eq!(first.direct_edges(), second.direct_edges());
    assert_eq!(first.reverse_edges(), second.reverse_edges());
    assert_eq!(
        first.transitive_closure().expect("acyclic"),
        second.transitive_closure().expect("acyclic")
    );
    assert_eq!(first.content_hash(), second.content_hash());
}

#[test]
fn part_reused_across_assemblies_gets_one_pair_per_root() {
    // Shared bolt under three assemblies, one of them nested
    let graph = make_graph(&[
        ("SLED", "SUSP"),
        ("SUSP", "BOLT"),
        ("ENGINE", "BOLT"),
        ("TRACK", "BOLT"),
    ]);
    let pairs = graph.transitive_closure().expect("acyclic");

    let bolt = PartId::new("BOLT");
    let ancestors: Vec<&PartId> = pairs
        .iter()
        .filter(|p| p.descendant == bolt)
        .map(|p| &p.ancestor)
        .collect();
    // BOLT sits under SUSP, SLED (transitively), ENGINE, and TRACK
    assert_eq!(ancestors.len(), 4);
}

#[test]
fn isolated_nodes_produce_no_closure_pairs() {
    let graph = make_graph(&[("A", "B")]);
    let pairs = graph.transitive_closure().expect("acyclic");
    assert_eq!(pairs, vec![pair("B", "A")]);
}

#[test]
fn deep_chain_does_not_overflow_cycle_detection() {
    // Iterative DFS must handle chains far beyond any recursion limit
    let names: Vec<String> = (0..50_000).map(|i| format!("N{i}")).collect();
    let mut builder = GraphBuilder::new();
    for window in names.windows(2) {
        builder.add_edge(&ResolvedEdge::direct(&window[0], &window[1]));
    }
    let graph = builder.finish();

    assert!(graph.find_cycle().is_none());
}

#[test]
fn chain_closure_pair_count() {
    let names: Vec<String> = (0..500).map(|i| format!("N{i}")).collect();
    let mut builder = GraphBuilder::new();
    for window in names.windows(2) {
        builder.add_edge(&ResolvedEdge::direct(&window[0], &window[1]));
    }
    let graph = builder.finish();

    let pairs = graph.transitive_closure().expect("acyclic");
    // Chain of n nodes has n*(n-1)/2 descendant/ancestor pairs
    assert_eq!(pairs.len(), 500 * 499 / 2);
}

#[test]
fn closure_output_is_sorted() {
    let graph = make_graph(&[("Z", "M"), ("A", "M"), ("M", "B")]);
    let pairs = graph.transitive_closure().expect("acyclic");
    let mut sorted = pairs.clone();
    sorted.sort();
    assert_eq!(pairs, sorted);
}

#[test]
fn duplicate_and_self_loop_diagnostics() {
    let mut builder = GraphBuilder::new();
    builder.add_edge(&ResolvedEdge::direct("A", "B"));
    builder.add_edge(&ResolvedEdge::direct("A", "B"));
    builder.add_edge(&ResolvedEdge::direct("B", "B"));
    let graph = builder.finish();

    assert_eq!(graph.diagnostics().duplicate_edges, 1);
    assert_eq!(graph.diagnostics().self_loops, 1);
    assert_eq!(graph.edge_count(), 1);
    // The self-loop never entered the graph, so closure still works
    assert_eq!(graph.transitive_closure().expect("acyclic").len(), 1);
}
