//! Resolution diagnostics: every skip and every tie-break, auditable.

use crate::model::PartId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::resolver::TokenResolution;

/// A token that could not be resolved, with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownToken {
    /// The token as it appeared in the input
    pub token: String,
    /// How many edge endpoints carried it
    pub occurrences: usize,
}

/// A deterministic tie-break decision for one ambiguous token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieBreakEvent {
    /// The ambiguous token
    pub token: String,
    /// The identifier the comparator chain selected
    pub chosen: PartId,
    /// Every candidate that lost, in comparator order
    pub rejected: Vec<PartId>,
    /// How many edge endpoints carried the token
    pub occurrences: usize,
}

/// Per-edge resolution trace entry (recorded only when tracing is enabled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTrace {
    /// Parent token resolution
    pub parent: TokenResolution,
    /// Child token resolution
    pub child: TokenResolution,
}

/// Accumulated outcome counters and itemized issues for one resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionDiagnostics {
    /// Raw edges seen across all batches
    pub input_edges: usize,
    /// Edges with both tokens resolved
    pub resolved_edges: usize,
    /// Edges dropped because a token stayed unresolved
    pub dropped_edges: usize,
    /// Endpoint counts by outcome
    pub exact: usize,
    /// Endpoints resolved only after case folding
    pub case_insensitive: usize,
    /// Endpoints resolved because the token was itself a known identifier
    pub numeric_fallbacks: usize,
    /// Endpoints resolved by tie-break
    pub tie_breaks: usize,
    /// Identifier-mode endpoints not present in the index (kept anyway)
    pub unindexed_identifiers: usize,
    /// Itemized unknown tokens
    pub unknown_tokens: Vec<UnknownToken>,
    /// Itemized tie-break decisions
    pub tie_break_events: Vec<TieBreakEvent>,
    /// Optional per-edge trace
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<EdgeTrace>,
}

impl ResolutionDiagnostics {
    /// True if every input edge resolved cleanly with no tie-breaks.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dropped_edges == 0 && self.tie_breaks == 0 && self.unindexed_identifiers == 0
    }
}

/// Mutable accumulator used while merging per-edge results.
#[derive(Debug, Default)]
pub(super) struct DiagnosticsBuilder {
    pub input_edges: usize,
    pub resolved_edges: usize,
    pub dropped_edges: usize,
    pub exact: usize,
    pub case_insensitive: usize,
    pub numeric_fallbacks: usize,
    pub tie_breaks: usize,
    pub unindexed_identifiers: usize,
    unknown: IndexMap<String, usize>,
    tie_break: IndexMap<String, (PartId, Vec<PartId>, usize)>,
    pub trace: Vec<EdgeTrace>,
}

impl DiagnosticsBuilder {
    pub fn record_unknown(&mut self, token: &str) {
        *self.unknown.entry(token.to_string()).or_insert(0) += 1;
    }

    pub fn record_tie_break(&mut self, token: &str, chosen: &PartId, rejected: &[PartId]) {
        self.tie_breaks += 1;
        self.tie_break
            .entry(token.to_string())
            .and_modify(|(_, _, n)| *n += 1)
            .or_insert_with(|| (chosen.clone(), rejected.to_vec(), 1));
    }

    /// Finalize into the immutable report shape, with itemized lists sorted
    /// by token so output is independent of input ordering.
    pub fn finish(self) -> ResolutionDiagnostics {
        let mut unknown_tokens: Vec<UnknownToken> = self
            .unknown
            .into_iter()
            .map(|(token, occurrences)| UnknownToken { token, occurrences })
            .collect();
        unknown_tokens.sort_by(|a, b| a.token.cmp(&b.token));

        let mut tie_break_events: Vec<TieBreakEvent> = self
            .tie_break
            .into_iter()
            .map(|(token, (chosen, rejected, occurrences))| TieBreakEvent {
                token,
                chosen,
                rejected,
                occurrences,
            })
            .collect();
        tie_break_events.sort_by(|a, b| a.token.cmp(&b.token));

        ResolutionDiagnostics {
            input_edges: self.input_edges,
            resolved_edges: self.resolved_edges,
            dropped_edges: self.dropped_edges,
            exact: self.exact,
            case_insensitive: self.case_insensitive,
            numeric_fallbacks: self.numeric_fallbacks,
            tie_breaks: self.tie_breaks,
            unindexed_identifiers: self.unindexed_identifiers,
            unknown_tokens,
            tie_break_events,
            trace: self.trace,
        }
    }
}
