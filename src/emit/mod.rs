//! Emitter boundary: the record shapes handed to a graph-store collaborator.
//!
//! The core does not own any wire protocol or persistence format. It produces
//! plain records and pushes them through the [`GraphRecordSink`] trait; the
//! surrounding tooling implements the trait against whatever backend it
//! targets. A collecting sink (tests) and a JSON Lines sink (debugging,
//! fixtures) ship with the crate.

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{ErrorContext, Result};
use crate::model::{PartId, PartMeta};

/// One part node in the output graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Stable identifier
    pub identifier: PartId,
    /// Display name; falls back to the identifier when no name was recorded
    pub name: String,
    /// Metadata carried over from the last record for this identifier
    #[serde(default, skip_serializing_if = "PartMeta::is_empty")]
    pub meta: PartMeta,
}

/// One directed edge in the output graph, with display names for both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Parent identifier
    pub parent: PartId,
    /// Child identifier
    pub child: PartId,
    /// Parent display name (identifier when unnamed)
    pub parent_name: String,
    /// Child display name (identifier when unnamed)
    pub child_name: String,
    /// How many input rows produced this pair
    pub occurrences: u32,
}

/// One descendant-to-ancestor closure pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureRecord {
    /// The contained part
    pub descendant: PartId,
    /// The containing assembly, at any depth
    pub ancestor: PartId,
}

/// Consumer of the final record stream.
///
/// Calls arrive grouped: all nodes, then direct edges, then reverse edges,
/// then closure pairs, then one `finish`.
pub trait GraphRecordSink {
    /// Consume one node record.
    fn emit_node(&mut self, node: &NodeRecord) -> Result<()>;
    /// Consume one direct (parent contains child) edge.
    fn emit_direct_edge(&mut self, edge: &EdgeRecord) -> Result<()>;
    /// Consume one reverse (child used in parent) edge.
    fn emit_reverse_edge(&mut self, edge: &EdgeRecord) -> Result<()>;
    /// Consume one closure pair.
    fn emit_closure_pair(&mut self, pair: &ClosureRecord) -> Result<()>;
    /// Flush any buffered state.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sink that keeps every record in memory; the test double.
#[derive(Debug, Default)]
pub struct CollectingSink {
    /// Emitted nodes
    pub nodes: Vec<NodeRecord>,
    /// Emitted direct edges
    pub direct_edges: Vec<EdgeRecord>,
    /// Emitted reverse edges
    pub reverse_edges: Vec<EdgeRecord>,
    /// Emitted closure pairs
    pub closure_pairs: Vec<ClosureRecord>,
    /// Whether `finish` was called
    pub finished: bool,
}

impl GraphRecordSink for CollectingSink {
    fn emit_node(&mut self, node: &NodeRecord) -> Result<()> {
        self.nodes.push(node.clone());
        Ok(())
    }

    fn emit_direct_edge(&mut self, edge: &EdgeRecord) -> Result<()> {
        self.direct_edges.push(edge.clone());
        Ok(())
    }

    fn emit_reverse_edge(&mut self, edge: &EdgeRecord) -> Result<()> {
        self.reverse_edges.push(edge.clone());
        Ok(())
    }

    fn emit_closure_pair(&mut self, pair: &ClosureRecord) -> Result<()> {
        self.closure_pairs.push(pair.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Record wrapper tagging each JSON line with its kind.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum TaggedRecord<'r> {
    Node(&'r NodeRecord),
    DirectEdge(&'r EdgeRecord),
    ReverseEdge(&'r EdgeRecord),
    ClosurePair(&'r ClosureRecord),
}

/// Sink that writes one tagged JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, record: &TaggedRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(record)
            .map_err(|e| crate::error::BomGraphError::validation(e.to_string()))?;
        self.writer
            .write_all(line.as_bytes())
            .context("writing record line")?;
        self.writer.write_all(b"\n").context("writing newline")?;
        Ok(())
    }
}

impl<W: Write> GraphRecordSink for JsonLinesSink<W> {
    fn emit_node(&mut self, node: &NodeRecord) -> Result<()> {
        self.write_record(&TaggedRecord::Node(node))
    }

    fn emit_direct_edge(&mut self, edge: &EdgeRecord) -> Result<()> {
        self.write_record(&TaggedRecord::DirectEdge(edge))
    }

    fn emit_reverse_edge(&mut self, edge: &EdgeRecord) -> Result<()> {
        self.write_record(&TaggedRecord::ReverseEdge(edge))
    }

    fn emit_closure_pair(&mut self, pair: &ClosureRecord) -> Result<()> {
        self.write_record(&TaggedRecord::ClosurePair(pair))
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("flushing sink")?;
        Ok(())
    }
}
