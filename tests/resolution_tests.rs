//! Integration tests for the name resolution engine.

use bom_graph_tools::error::BomGraphError;
use bom_graph_tools::model::{CrossRefIndex, EdgeBatch, PartRecord, RawEdge};
use bom_graph_tools::resolve::{
    resolve_edges, NameResolver, ResolutionPolicy, ResolutionStatus,
};

/// Helper to build an index from (identifier, name, revision) triples.
fn make_index(parts: &[(&str, &str, Option<&str>)]) -> CrossRefIndex {
    CrossRefIndex::build(parts.iter().map(|(id, name, revision)| {
        let record = PartRecord::new(*id, *name);
        match revision {
            Some(rev) => record.with_revision(*rev),
            None => record,
        }
    }))
}

/// Helper to wrap name pairs into a single batch.
fn name_edges(pairs: &[(&str, &str)]) -> Vec<EdgeBatch> {
    vec![EdgeBatch::names(
        pairs.iter().map(|(p, c)| RawEdge::new(*p, *c)).collect(),
    )]
}

#[test]
fn scenario_a_revision_recency_tie_break() {
    // "Engine" maps to E1 (rev 2) and E2 (rev 1); lenient policy with
    // prefer_revision_recency resolves to E1
    let index = make_index(&[
        ("E1", "Engine", Some("2")),
        ("E2", "Engine", Some("1")),
        ("CHASSIS", "Chassis", None),
    ]);

    let outcome = resolve_edges(
        &name_edges(&[("Chassis", "Engine")]),
        &index,
        &ResolutionPolicy::lenient(),
    )
    .expect("lenient resolution succeeds");

    assert_eq!(outcome.edges.len(), 1);
    assert_eq!(outcome.edges[0].child.value(), "E1");
    assert_eq!(
        outcome.edges[0].child_status,
        ResolutionStatus::ResolvedTieBreak
    );
}

#[test]
fn scenario_b_numeric_fallback() {
    // "0114032" is a known identifier but not indexed under any name
    let index = make_index(&[("SNOW100", "100 SNOW", None), ("0114032", "", None)]);

    let outcome = resolve_edges(
        &name_edges(&[("100 SNOW", "0114032")]),
        &index,
        &ResolutionPolicy::lenient(),
    )
    .expect("lenient resolution succeeds");

    assert_eq!(outcome.edges.len(), 1);
    assert_eq!(outcome.edges[0].parent.value(), "SNOW100");
    assert_eq!(outcome.edges[0].child.value(), "0114032");
    assert_eq!(
        outcome.edges[0].child_status,
        ResolutionStatus::ResolvedNumericFallback
    );
    assert_eq!(outcome.diagnostics.dropped_edges, 0);
}

#[test]
fn scenario_e_strict_one_ambiguity_fails_whole_run() {
    // One ambiguous name among 100 edges: the run fails with an aggregated
    // error listing that name and its candidates, and zero edges come back
    let mut parts: Vec<(String, String)> = (0..100)
        .map(|i| (format!("P{i}"), format!("Part {i}")))
        .collect();
    parts.push(("X1".to_string(), "Duplicate".to_string()));
    parts.push(("X2".to_string(), "Duplicate".to_string()));

    let index = CrossRefIndex::build(
        parts
            .iter()
            .map(|(id, name)| PartRecord::new(id.clone(), name.clone())),
    );

    let mut pairs: Vec<RawEdge> = (1..100)
        .map(|i| RawEdge::new("Part 0".to_string(), format!("Part {i}")))
        .collect();
    pairs.push(RawEdge::new("Part 0", "Duplicate"));
    let batches = vec![EdgeBatch::names(pairs)];

    let err = resolve_edges(&batches, &index, &ResolutionPolicy::strict())
        .expect_err("strict run must fail");

    match err {
        BomGraphError::Resolution {
            source: bom_graph_tools::error::ResolveErrorKind::StrictPolicy(failure),
            ..
        } => {
            assert_eq!(failure.failures.len(), 1);
            assert_eq!(failure.failures[0].token, "Duplicate");
            assert_eq!(failure.failures[0].candidates, vec!["X1", "X2"]);
        }
        other => panic!("expected Resolution error, got {other:?}"),
    }
}

#[test]
fn resolution_is_deterministic_across_runs() {
    let index = make_index(&[
        ("E1", "Engine", Some("2")),
        ("E2", "Engine", Some("1")),
        ("F1", "Frame", None),
        ("T1", "Track", None),
    ]);
    let batches = name_edges(&[
        ("Frame", "Engine"),
        ("Frame", "Track"),
        ("Track", "engine"),
    ]);
    let policy = ResolutionPolicy::lenient();

    let first = resolve_edges(&batches, &index, &policy).expect("first run");
    let second = resolve_edges(&batches, &index, &policy).expect("second run");

    assert_eq!(first.edges, second.edges);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn tie_break_decision_does_not_depend_on_record_order() {
    // Same records in two insertion orders must elect the same winner
    let forward = make_index(&[
        ("E1", "Engine", Some("2")),
        ("E2", "Engine", Some("1")),
        ("F1", "Frame", None),
    ]);
    let backward = make_index(&[
        ("F1", "Frame", None),
        ("E2", "Engine", Some("1")),
        ("E1", "Engine", Some("2")),
    ]);

    let batches = name_edges(&[("Frame", "Engine")]);
    let policy = ResolutionPolicy::lenient();

    let a = resolve_edges(&batches, &forward, &policy).expect("forward");
    let b = resolve_edges(&batches, &backward, &policy).expect("backward");

    assert_eq!(a.edges[0].child, b.edges[0].child);
}

#[test]
fn case_insensitive_stage_reports_distinct_status() {
    let index = make_index(&[("F1", "Frame", None), ("T1", "Track", None)]);
    let outcome = resolve_edges(
        &name_edges(&[("FRAME", "Track")]),
        &index,
        &ResolutionPolicy::lenient(),
    )
    .expect("resolves");

    assert_eq!(
        outcome.edges[0].parent_status,
        ResolutionStatus::ResolvedCaseInsensitive
    );
    assert_eq!(
        outcome.edges[0].child_status,
        ResolutionStatus::ResolvedExact
    );
}

#[test]
fn lenient_run_reports_every_skip() {
    let index = make_index(&[("F1", "Frame", None)]);
    let outcome = resolve_edges(
        &name_edges(&[
            ("Frame", "Ghost"),
            ("Phantom", "Frame"),
            ("Frame", "Ghost"),
        ]),
        &index,
        &ResolutionPolicy::lenient(),
    )
    .expect("lenient always succeeds");

    assert!(outcome.edges.is_empty());
    assert_eq!(outcome.diagnostics.dropped_edges, 3);
    // Ghost appears twice, Phantom once; list is sorted by token
    assert_eq!(outcome.diagnostics.unknown_tokens.len(), 2);
    assert_eq!(outcome.diagnostics.unknown_tokens[0].token, "Ghost");
    assert_eq!(outcome.diagnostics.unknown_tokens[0].occurrences, 2);
    assert_eq!(outcome.diagnostics.unknown_tokens[1].token, "Phantom");
}

#[test]
fn parallel_and_sequential_agree_on_large_input() {
    let parts: Vec<PartRecord> = (0..500)
        .map(|i| PartRecord::new(format!("P{i}"), format!("Part {i}")))
        .collect();
    let index = CrossRefIndex::build(parts);

    let edges: Vec<RawEdge> = (1..500)
        .map(|i| RawEdge::new("Part 0".to_string(), format!("Part {i}")))
        .collect();
    let batches = vec![EdgeBatch::names(edges)];

    let resolver = NameResolver::new(&index, ResolutionPolicy::lenient());
    let sequential = resolver.resolve(&batches).expect("sequential");
    let parallel = resolver.resolve_parallel(&batches).expect("parallel");

    assert_eq!(sequential.edges, parallel.edges);
    assert_eq!(sequential.diagnostics, parallel.diagnostics);
}
