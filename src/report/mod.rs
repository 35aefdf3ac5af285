//! Run report: every count and every skip from a full pipeline run.
//!
//! Recoverable data-quality conditions are data, not exceptions; they all
//! land here. The report is serializable for machine consumption and renders
//! a human-readable summary block for logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::graph::GraphDiagnostics;
use crate::model::XrefStats;
use crate::resolve::ResolutionDiagnostics;

/// Aggregated diagnostics for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Index construction counters
    pub index: XrefStats,
    /// Name resolution counters and itemized issues
    pub resolution: ResolutionDiagnostics,
    /// Graph construction counters
    pub graph: GraphDiagnostics,
    /// Node count in the emitted output
    pub node_count: usize,
    /// Deduplicated direct edge count
    pub direct_edge_count: usize,
    /// Reverse edge count (always equals `direct_edge_count`)
    pub reverse_edge_count: usize,
    /// Closure pair count (zero when a cycle blocked closure)
    pub closure_pair_count: usize,
    /// The cycle that blocked closure computation, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<Vec<String>>,
    /// Graph content hash, for idempotence checks across runs
    pub graph_content_hash: u64,
}

impl RunReport {
    /// True if the run had no drops, no tie-breaks, and no cycle.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.index.dropped_records == 0
            && self.resolution.is_clean()
            && self.graph.duplicate_edges == 0
            && self.graph.self_loops == 0
            && self.cycle.is_none()
    }

    /// Total number of recoverable issues of any kind.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.index.dropped_records
            + self.resolution.dropped_edges
            + self.resolution.tie_breaks
            + self.resolution.unindexed_identifiers
            + self.graph.duplicate_edges
            + self.graph.self_loops
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BOM graph run summary")?;
        writeln!(f, "  nodes:          {}", self.node_count)?;
        writeln!(f, "  direct edges:   {}", self.direct_edge_count)?;
        writeln!(f, "  reverse edges:  {}", self.reverse_edge_count)?;
        writeln!(f, "  closure pairs:  {}", self.closure_pair_count)?;
        writeln!(
            f,
            "  records:        {} seen, {} dropped, {} unnamed",
            self.index.records_total, self.index.dropped_records, self.index.unnamed_records
        )?;
        writeln!(
            f,
            "  resolution:     {} in, {} resolved, {} dropped, {} tie-broken",
            self.resolution.input_edges,
            self.resolution.resolved_edges,
            self.resolution.dropped_edges,
            self.resolution.tie_breaks
        )?;
        writeln!(
            f,
            "  graph:          {} duplicates collapsed, {} self-loops rejected",
            self.graph.duplicate_edges, self.graph.self_loops
        )?;
        if let Some(cycle) = &self.cycle {
            writeln!(f, "  cycle:          {}", cycle.join(" -> "))?;
        }
        write!(f, "  content hash:   {:016x}", self.graph_content_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report() -> RunReport {
        RunReport {
            generated_at: Utc::now(),
            index: XrefStats::default(),
            resolution: ResolutionDiagnostics::default(),
            graph: GraphDiagnostics::default(),
            node_count: 0,
            direct_edge_count: 0,
            reverse_edge_count: 0,
            closure_pair_count: 0,
            cycle: None,
            graph_content_hash: 0,
        }
    }

    #[test]
    fn test_clean_report() {
        let report = empty_report();
        assert!(report.is_clean());
        assert_eq!(report.issue_count(), 0);
    }

    #[test]
    fn test_issues_counted() {
        let mut report = empty_report();
        report.index.dropped_records = 2;
        report.resolution.dropped_edges = 1;
        report.graph.self_loops = 1;
        assert!(!report.is_clean());
        assert_eq!(report.issue_count(), 4);
    }

    #[test]
    fn test_summary_includes_cycle() {
        let mut report = empty_report();
        report.cycle = Some(vec!["A".into(), "B".into(), "A".into()]);
        let rendered = report.to_string();
        assert!(rendered.contains("A -> B -> A"));
    }

    #[test]
    fn test_report_serializes() {
        let report = empty_report();
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("generated_at"));
    }
}
