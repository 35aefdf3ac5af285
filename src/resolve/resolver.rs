//! Tiered name-to-identifier resolution.
//!
//! Each edge endpoint goes through the same cascade: exact normalized match,
//! case-folded match, known-identifier fallback, then policy-driven tie-break
//! or rejection. Every stage is deterministic (candidate order comes from
//! explicit comparators, never from map iteration order), so the same input,
//! index, and policy always produce the same output regardless of edge
//! ordering.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{BomGraphError, Result, TokenFailure, TokenFailureReason};
use crate::model::{
    fold_token, normalize_token, CrossRefIndex, EdgeBatch, EdgeMode, NameCandidate, PartId, RawEdge,
};

use super::diagnostics::{DiagnosticsBuilder, EdgeTrace, ResolutionDiagnostics};
use super::policy::ResolutionPolicy;

/// How an edge endpoint was resolved (or why it was not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionStatus {
    /// Unique match on the normalized, case-preserved name
    ResolvedExact,
    /// Unique match after case folding
    ResolvedCaseInsensitive,
    /// The token itself is a known identifier
    ResolvedNumericFallback,
    /// Ambiguous, deterministically chosen under lenient policy
    ResolvedTieBreak,
    /// No candidate at any stage
    Unknown,
    /// Multiple candidates, rejected under strict policy
    AmbiguousRejected,
}

impl ResolutionStatus {
    /// True if the endpoint produced an identifier.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(
            self,
            Self::ResolvedExact
                | Self::ResolvedCaseInsensitive
                | Self::ResolvedNumericFallback
                | Self::ResolvedTieBreak
        )
    }
}

/// Outcome of resolving one endpoint token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResolution {
    /// The token as supplied upstream
    pub token: String,
    /// Outcome status
    pub status: ResolutionStatus,
    /// Chosen identifier when resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PartId>,
    /// Candidates rejected by tie-break or strict policy, comparator order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<PartId>,
}

/// A fully resolved identifier edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedEdge {
    /// Parent identifier
    pub parent: PartId,
    /// Child identifier
    pub child: PartId,
    /// How the parent endpoint resolved
    pub parent_status: ResolutionStatus,
    /// How the child endpoint resolved
    pub child_status: ResolutionStatus,
}

impl ResolvedEdge {
    /// Create a resolved edge from two identifier tokens (both exact).
    ///
    /// Intended for tests and for callers that already hold identifier pairs.
    pub fn direct(parent: &str, child: &str) -> Self {
        Self {
            parent: PartId::new(parent),
            child: PartId::new(child),
            parent_status: ResolutionStatus::ResolvedExact,
            child_status: ResolutionStatus::ResolvedExact,
        }
    }
}

/// Result of a resolution run: accepted edges plus the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    /// Edges with both endpoints resolved, input order preserved
    pub edges: Vec<ResolvedEdge>,
    /// Counters and itemized issues
    pub diagnostics: ResolutionDiagnostics,
}

/// Per-edge intermediate result, merged sequentially after (possibly
/// parallel) per-edge work.
struct EdgeResolution {
    parent: TokenResolution,
    child: TokenResolution,
    unindexed_endpoints: u8,
}

/// Name resolver over an immutable cross-reference snapshot.
///
/// Stateless given the index: a shared resolver can process any number of
/// batches, sequentially or in parallel.
#[must_use]
pub struct NameResolver<'a> {
    index: &'a CrossRefIndex,
    policy: ResolutionPolicy,
    record_trace: bool,
}

impl<'a> NameResolver<'a> {
    /// Create a resolver for an index snapshot and policy.
    pub fn new(index: &'a CrossRefIndex, policy: ResolutionPolicy) -> Self {
        Self {
            index,
            policy,
            record_trace: false,
        }
    }

    /// Record a per-edge trace entry for every input edge.
    pub const fn with_trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }

    /// The policy this resolver applies.
    #[must_use]
    pub const fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    /// Resolve all batches sequentially.
    pub fn resolve(&self, batches: &[EdgeBatch]) -> Result<ResolutionOutcome> {
        let resolutions: Vec<EdgeResolution> = flatten(batches)
            .map(|(mode, edge)| self.resolve_raw_edge(mode, edge))
            .collect();
        self.finish(resolutions)
    }

    /// Resolve all batches with per-edge parallelism.
    ///
    /// The index is an immutable snapshot, so edges resolve independently;
    /// collection preserves input order, keeping output identical to the
    /// sequential path.
    pub fn resolve_parallel(&self, batches: &[EdgeBatch]) -> Result<ResolutionOutcome> {
        let work: Vec<(EdgeMode, &RawEdge)> = flatten(batches).collect();
        let resolutions: Vec<EdgeResolution> = work
            .into_par_iter()
            .map(|(mode, edge)| self.resolve_raw_edge(mode, edge))
            .collect();
        self.finish(resolutions)
    }

    /// Resolve one raw edge into per-endpoint outcomes.
    fn resolve_raw_edge(&self, mode: EdgeMode, edge: &RawEdge) -> EdgeResolution {
        match mode {
            EdgeMode::Identifier => {
                let (parent, p_unindexed) = self.pass_through_token(&edge.parent);
                let (child, c_unindexed) = self.pass_through_token(&edge.child);
                EdgeResolution {
                    parent,
                    child,
                    unindexed_endpoints: u8::from(p_unindexed) + u8::from(c_unindexed),
                }
            }
            EdgeMode::Name => EdgeResolution {
                parent: self.resolve_name_token(&edge.parent),
                child: self.resolve_name_token(&edge.child),
                unindexed_endpoints: 0,
            },
        }
    }

    /// Identifier-mode pass-through: normalize only.
    ///
    /// Tokens absent from the index are kept (the emitted node set covers
    /// every identifier appearing in any edge or record) but flagged so the
    /// report can surface them.
    fn pass_through_token(&self, token: &str) -> (TokenResolution, bool) {
        let id = PartId::new(token);
        if id.is_empty() {
            return (
                TokenResolution {
                    token: token.to_string(),
                    status: ResolutionStatus::Unknown,
                    id: None,
                    rejected: Vec::new(),
                },
                false,
            );
        }
        let unindexed = !self.index.is_known_identifier(token);
        (
            TokenResolution {
                token: token.to_string(),
                status: ResolutionStatus::ResolvedExact,
                id: Some(id),
                rejected: Vec::new(),
            },
            unindexed,
        )
    }

    /// Resolve one name token through the full cascade.
    fn resolve_name_token(&self, token: &str) -> TokenResolution {
        let normalized = normalize_token(token);
        if normalized.is_empty() {
            return unresolved(token, ResolutionStatus::Unknown, Vec::new());
        }

        let exact = self.index.name_to_identifiers(&normalized);
        if exact.len() == 1 {
            return resolved(token, ResolutionStatus::ResolvedExact, exact[0].id.clone());
        }

        let folded = self.index.name_to_identifiers_folded(&fold_token(&normalized));
        if folded.len() == 1 {
            return resolved(
                token,
                ResolutionStatus::ResolvedCaseInsensitive,
                folded[0].id.clone(),
            );
        }

        if exact.is_empty() && folded.is_empty() {
            if self.index.is_known_identifier(&normalized) {
                return resolved(
                    token,
                    ResolutionStatus::ResolvedNumericFallback,
                    PartId::new(&normalized),
                );
            }
            return unresolved(token, ResolutionStatus::Unknown, Vec::new());
        }

        // Ambiguous. The narrower exact-stage candidate set wins over the
        // folded one; it is never widened by merging the two.
        let pool = if exact.is_empty() { folded } else { exact };
        if self.policy.is_strict() {
            let rejected = sorted_candidates(pool, &self.policy)
                .into_iter()
                .map(|c| c.id.clone())
                .collect();
            return unresolved(token, ResolutionStatus::AmbiguousRejected, rejected);
        }

        let ranked = sorted_candidates(pool, &self.policy);
        let chosen = ranked[0].id.clone();
        let rejected: Vec<PartId> = ranked[1..].iter().map(|c| c.id.clone()).collect();
        TokenResolution {
            token: token.to_string(),
            status: ResolutionStatus::ResolvedTieBreak,
            id: Some(chosen),
            rejected,
        }
    }

    /// Merge per-edge results into the final outcome, applying policy.
    fn finish(&self, resolutions: Vec<EdgeResolution>) -> Result<ResolutionOutcome> {
        let mut builder = DiagnosticsBuilder::default();
        let mut edges = Vec::new();
        let mut failures: Vec<TokenFailure> = Vec::new();

        builder.input_edges = resolutions.len();

        for res in resolutions {
            builder.unindexed_identifiers += usize::from(res.unindexed_endpoints);

            for endpoint in [&res.parent, &res.child] {
                tally(&mut builder, endpoint);
                if self.policy.is_strict() {
                    harvest_failure(&mut failures, endpoint);
                }
            }

            if let (Some(parent), Some(child)) = (res.parent.id.clone(), res.child.id.clone()) {
                builder.resolved_edges += 1;
                edges.push(ResolvedEdge {
                    parent,
                    child,
                    parent_status: res.parent.status,
                    child_status: res.child.status,
                });
            } else {
                builder.dropped_edges += 1;
                tracing::debug!(
                    parent = %res.parent.token,
                    child = %res.child.token,
                    "dropping edge with unresolved endpoint"
                );
            }

            if self.record_trace {
                builder.trace.push(EdgeTrace {
                    parent: res.parent,
                    child: res.child,
                });
            }
        }

        if self.policy.is_strict() && !failures.is_empty() {
            failures.sort_by(|a, b| a.token.cmp(&b.token));
            failures.dedup_by(|a, b| a.token == b.token);
            tracing::error!(
                offending_tokens = failures.len(),
                "strict policy violated; aborting resolution"
            );
            return Err(BomGraphError::strict_policy(failures));
        }

        let diagnostics = builder.finish();
        tracing::info!(
            input = diagnostics.input_edges,
            resolved = diagnostics.resolved_edges,
            dropped = diagnostics.dropped_edges,
            tie_breaks = diagnostics.tie_breaks,
            "edge resolution complete"
        );

        Ok(ResolutionOutcome { edges, diagnostics })
    }
}

/// Resolve batches against an index under a policy (sequential convenience).
pub fn resolve_edges(
    batches: &[EdgeBatch],
    index: &CrossRefIndex,
    policy: &ResolutionPolicy,
) -> Result<ResolutionOutcome> {
    NameResolver::new(index, policy.clone()).resolve(batches)
}

fn flatten(batches: &[EdgeBatch]) -> impl Iterator<Item = (EdgeMode, &RawEdge)> {
    batches
        .iter()
        .flat_map(|batch| batch.edges.iter().map(move |edge| (batch.mode, edge)))
}

fn resolved(token: &str, status: ResolutionStatus, id: PartId) -> TokenResolution {
    TokenResolution {
        token: token.to_string(),
        status,
        id: Some(id),
        rejected: Vec::new(),
    }
}

fn unresolved(token: &str, status: ResolutionStatus, rejected: Vec<PartId>) -> TokenResolution {
    TokenResolution {
        token: token.to_string(),
        status,
        id: None,
        rejected,
    }
}

fn tally(builder: &mut DiagnosticsBuilder, endpoint: &TokenResolution) {
    match endpoint.status {
        ResolutionStatus::ResolvedExact => builder.exact += 1,
        ResolutionStatus::ResolvedCaseInsensitive => builder.case_insensitive += 1,
        ResolutionStatus::ResolvedNumericFallback => builder.numeric_fallbacks += 1,
        ResolutionStatus::ResolvedTieBreak => {
            if let Some(chosen) = &endpoint.id {
                builder.record_tie_break(&endpoint.token, chosen, &endpoint.rejected);
            }
        }
        ResolutionStatus::Unknown => builder.record_unknown(&endpoint.token),
        ResolutionStatus::AmbiguousRejected => {}
    }
}

fn harvest_failure(failures: &mut Vec<TokenFailure>, endpoint: &TokenResolution) {
    match endpoint.status {
        ResolutionStatus::Unknown => failures.push(TokenFailure {
            token: endpoint.token.clone(),
            reason: TokenFailureReason::Unknown,
            candidates: Vec::new(),
        }),
        ResolutionStatus::AmbiguousRejected => failures.push(TokenFailure {
            token: endpoint.token.clone(),
            reason: TokenFailureReason::Ambiguous,
            candidates: endpoint.rejected.iter().map(|id| id.value().to_string()).collect(),
        }),
        _ => {}
    }
}

// ============================================================================
// Tie-break comparator chain
// ============================================================================

/// Candidates ranked by the explicit comparator chain: revision recency,
/// preferred view, preferred container, then smallest identifier.
fn sorted_candidates<'c>(
    pool: &'c [NameCandidate],
    policy: &ResolutionPolicy,
) -> Vec<&'c NameCandidate> {
    let mut ranked: Vec<&NameCandidate> = pool.iter().collect();
    ranked.sort_by(|a, b| cmp_candidates(a, b, policy));
    ranked
}

fn cmp_candidates(a: &NameCandidate, b: &NameCandidate, policy: &ResolutionPolicy) -> Ordering {
    let mut ord = Ordering::Equal;
    if policy.prefer_revision_recency {
        ord = cmp_revision_desc(a.meta.revision.as_deref(), b.meta.revision.as_deref());
    }
    ord.then_with(|| {
        cmp_preference_match(
            a.meta.view.as_deref(),
            b.meta.view.as_deref(),
            policy.preferred_view.as_deref(),
        )
    })
    .then_with(|| {
        cmp_preference_match(
            a.meta.container.as_deref(),
            b.meta.container.as_deref(),
            policy.preferred_container.as_deref(),
        )
    })
    .then_with(|| a.id.cmp(&b.id))
}

/// Most recent revision first; a present revision outranks an absent one.
fn cmp_revision_desc(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(ra), Some(rb)) => natural_cmp(rb, ra),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Candidates matching the configured preference sort first; no preference
/// configured means no contribution to the ordering.
fn cmp_preference_match(a: Option<&str>, b: Option<&str>, preferred: Option<&str>) -> Ordering {
    let Some(preferred) = preferred else {
        return Ordering::Equal;
    };
    let a_matches = a == Some(preferred);
    let b_matches = b == Some(preferred);
    b_matches.cmp(&a_matches)
}

/// Natural ordering: digit runs compare numerically, text runs bytewise.
///
/// Gives "2" > "1", "10" > "9", "B.2" > "B.1": the behavior expected of
/// revision markers that are sometimes numbers and sometimes letter codes.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0usize, 0usize);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let si = i;
            while i < a.len() && a[i].is_ascii_digit() {
                i += 1;
            }
            let sj = j;
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }
            let na = trim_leading_zeros(&a[si..i]);
            let nb = trim_leading_zeros(&b[sj..j]);
            let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = a[i].cmp(&b[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }
    (a.len() - i).cmp(&(b.len() - j))
}

fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let start = digits.iter().position(|&d| d != b'0').unwrap_or(digits.len() - 1);
    &digits[start..]
}
