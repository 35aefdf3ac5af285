//! Name resolution: mapping name-based edges onto identifier-based edges.
//!
//! # Architecture
//!
//! Resolution is a pure function of three inputs: the raw edge batches, an
//! immutable [`CrossRefIndex`](crate::model::CrossRefIndex) snapshot, and a
//! [`ResolutionPolicy`]. The cascade per endpoint token:
//!
//! 1. Exact match on the normalized, case-preserved name
//! 2. Case-folded match
//! 3. Known-identifier fallback (a "name" column holding a bare identifier)
//! 4. Deterministic tie-break (lenient) or aggregated failure (strict)
//!
//! Outcomes are data, not control flow: every endpoint carries a
//! [`ResolutionStatus`], and recoverable issues land in
//! [`ResolutionDiagnostics`] instead of being thrown.

mod diagnostics;
mod policy;
mod resolver;

pub use diagnostics::{EdgeTrace, ResolutionDiagnostics, TieBreakEvent, UnknownToken};
pub use policy::{PolicyMode, ResolutionPolicy};
pub use resolver::{
    resolve_edges, NameResolver, ResolutionOutcome, ResolutionStatus, ResolvedEdge,
    TokenResolution,
};
