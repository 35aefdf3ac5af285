//! Pipeline orchestration: index, resolve, build, output.
//!
//! One call runs the full batch computation in memory: part records become an
//! immutable cross-reference snapshot, raw edge batches resolve against it,
//! the resolved set becomes a graph, and the graph's node/edge/closure sets
//! come back as emitter-ready records with a full run report. All file and
//! network I/O stays with the collaborators on either side.

use std::time::Instant;

use chrono::Utc;

use crate::config::AppConfig;
use crate::emit::{ClosureRecord, EdgeRecord, GraphRecordSink, NodeRecord};
use crate::error::{BomGraphError, Result};
use crate::graph::{BomGraph, DirectEdge, GraphBuilder};
use crate::model::{CrossRefIndex, EdgeBatch, PartId, PartMeta, PartRecord};
use crate::report::RunReport;
use crate::resolve::{NameResolver, ResolutionOutcome};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Resolution failed (strict policy violation)
    #[error("Resolution stage failed: {source}")]
    ResolveFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Closure computation failed on a structural cycle.
    ///
    /// The partial output still carries the node set and the direct and
    /// reverse edge sets for inspection; only closure pairs are missing.
    #[error("Closure stage failed: {source}")]
    ClosureFailed {
        #[source]
        source: anyhow::Error,
        partial: Box<GraphOutput>,
    },
}

/// Everything a graph-store collaborator needs from one run.
#[derive(Debug, Clone)]
pub struct GraphOutput {
    /// Every identifier appearing in any edge or record
    pub nodes: Vec<NodeRecord>,
    /// Deduplicated parent-to-child edges
    pub direct_edges: Vec<EdgeRecord>,
    /// Derived child-to-parent edges, 1:1 with direct
    pub reverse_edges: Vec<EdgeRecord>,
    /// Descendant-to-ancestor pairs at every depth
    pub closure_pairs: Vec<ClosureRecord>,
    /// Full run report
    pub report: RunReport,
}

impl GraphOutput {
    /// Stream every record into a sink, grouped: nodes, direct edges,
    /// reverse edges, closure pairs, finish.
    pub fn emit_to(&self, sink: &mut dyn GraphRecordSink) -> Result<()> {
        for node in &self.nodes {
            sink.emit_node(node)?;
        }
        for edge in &self.direct_edges {
            sink.emit_direct_edge(edge)?;
        }
        for edge in &self.reverse_edges {
            sink.emit_reverse_edge(edge)?;
        }
        for pair in &self.closure_pairs {
            sink.emit_closure_pair(pair)?;
        }
        sink.finish()
    }
}

/// Run the full pipeline.
///
/// Fails on a strict-policy resolution violation and on a structural cycle
/// (the latter with partial output attached); every recoverable condition
/// lands in the returned report instead.
pub fn run(
    records: Vec<PartRecord>,
    batches: &[EdgeBatch],
    config: &AppConfig,
) -> std::result::Result<GraphOutput, PipelineError> {
    let started = Instant::now();

    let index = CrossRefIndex::build(records);

    let resolution = resolve_stage(batches, &index, config)
        .map_err(|e| PipelineError::ResolveFailed { source: e.into() })?;

    let graph = graph_stage(&resolution);

    let output = assemble_output(&index, &graph, resolution, config);

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        nodes = output.report.node_count,
        edges = output.report.direct_edge_count,
        closure_pairs = output.report.closure_pair_count,
        "pipeline run complete"
    );

    if config.pipeline.compute_closure {
        if let Some(cycle) = &output.report.cycle {
            let err = BomGraphError::cycle(cycle.clone());
            return Err(PipelineError::ClosureFailed {
                source: err.into(),
                partial: Box::new(output),
            });
        }
    }

    Ok(output)
}

/// Resolution stage: sequential or parallel per configuration.
pub fn resolve_stage(
    batches: &[EdgeBatch],
    index: &CrossRefIndex,
    config: &AppConfig,
) -> Result<ResolutionOutcome> {
    let resolver = NameResolver::new(index, config.resolution.clone())
        .with_trace(config.diagnostics.record_trace);

    let edge_count: usize = batches.iter().map(|b| b.edges.len()).sum();
    if config.pipeline.parallel && edge_count >= config.pipeline.parallel_threshold {
        tracing::debug!(edge_count, "resolving edges in parallel");
        resolver.resolve_parallel(batches)
    } else {
        resolver.resolve(batches)
    }
}

/// Graph stage: accumulate the resolved edge set.
#[must_use]
pub fn graph_stage(resolution: &ResolutionOutcome) -> BomGraph {
    let mut builder = GraphBuilder::new();
    builder.add_edges(&resolution.edges);
    builder.finish()
}

/// Assemble emitter-ready records and the run report.
fn assemble_output(
    index: &CrossRefIndex,
    graph: &BomGraph,
    resolution: ResolutionOutcome,
    config: &AppConfig,
) -> GraphOutput {
    // Closure first: cycle detection feeds the report either way
    let (closure_pairs, cycle) = if config.pipeline.compute_closure {
        match graph.transitive_closure() {
            Ok(pairs) => (pairs, None),
            Err(_) => {
                let cycle = graph
                    .find_cycle()
                    .map(|ids| ids.iter().map(|id| id.value().to_string()).collect());
                (Vec::new(), cycle)
            }
        }
    } else {
        let cycle = graph
            .find_cycle()
            .map(|ids| ids.iter().map(|id| id.value().to_string()).collect());
        (Vec::new(), cycle)
    };

    let nodes = node_records(index, graph);
    let direct_edges = edge_records(index, graph.direct_edges());
    let reverse_edges = edge_records(index, graph.reverse_edges());
    let closure_records: Vec<ClosureRecord> = closure_pairs
        .into_iter()
        .map(|pair| ClosureRecord {
            descendant: pair.descendant,
            ancestor: pair.ancestor,
        })
        .collect();

    let report = RunReport {
        generated_at: Utc::now(),
        index: index.stats(),
        resolution: resolution.diagnostics,
        graph: graph.diagnostics().clone(),
        node_count: nodes.len(),
        direct_edge_count: direct_edges.len(),
        reverse_edge_count: reverse_edges.len(),
        closure_pair_count: closure_records.len(),
        cycle,
        graph_content_hash: graph.content_hash(),
    };

    GraphOutput {
        nodes,
        direct_edges,
        reverse_edges,
        closure_pairs: closure_records,
        report,
    }
}

/// Node set: every indexed identifier plus every graph-only identifier.
fn node_records(index: &CrossRefIndex, graph: &BomGraph) -> Vec<NodeRecord> {
    let mut nodes: Vec<NodeRecord> = index
        .identifiers()
        .map(|(id, name)| NodeRecord {
            identifier: id.clone(),
            name: display_name(name, id),
            meta: index.identifier_meta(id).cloned().unwrap_or_default(),
        })
        .collect();

    // Identifier-mode edges may reference parts absent from the records
    for id in graph.nodes() {
        if index.identifier_to_name(id).is_none() && index.identifier_meta(id).is_none() {
            nodes.push(NodeRecord {
                identifier: id.clone(),
                name: id.value().to_string(),
                meta: PartMeta::default(),
            });
        }
    }
    nodes
}

fn edge_records(index: &CrossRefIndex, edges: Vec<DirectEdge>) -> Vec<EdgeRecord> {
    edges
        .into_iter()
        .map(|edge| {
            let parent_name = index
                .identifier_to_name(&edge.parent)
                .map(String::from)
                .unwrap_or_else(|| edge.parent.value().to_string());
            let child_name = index
                .identifier_to_name(&edge.child)
                .map(String::from)
                .unwrap_or_else(|| edge.child.value().to_string());
            EdgeRecord {
                parent: edge.parent,
                child: edge.child,
                parent_name,
                child_name,
                occurrences: edge.occurrences,
            }
        })
        .collect()
}

fn display_name(name: &str, id: &PartId) -> String {
    if name.is_empty() {
        id.value().to_string()
    } else {
        name.to_string()
    }
}
