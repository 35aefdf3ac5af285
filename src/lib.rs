//! **A library for turning tabular part and BOM data into a consistent
//! labeled graph.**
//!
//! `bom-graph-tools` builds a deduplicated cross-reference between stable
//! part identifiers and free-text part names, resolves name-based
//! relationship edges into identifier-based edges under a deterministic
//! policy, detects structural anomalies (cycles, unresolved references), and
//! computes the transitive closure of the assembly hierarchy: everything a
//! graph-store loader needs between "rows" and "records".
//!
//! Identifiers are reliable; names are not. Several parts can share a name, a
//! name can be missing, and a name can coincidentally equal another part's
//! identifier. The resolution engine treats those conditions as data:
//! every outcome carries a status, every skip is counted and itemized, and
//! the same input always produces the same output.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`PartRecord`] inputs, [`PartId`] identifiers, and the
//!   immutable [`CrossRefIndex`] built once per run.
//! - **[`resolve`]**: the [`NameResolver`] cascade (exact, case-folded,
//!   known-identifier fallback, deterministic tie-break) under a strict or
//!   lenient [`ResolutionPolicy`].
//! - **[`graph`]**: the [`BomGraph`] with deduplicated direct edges, derived
//!   reverse edges, cycle detection, and memoized transitive closure.
//! - **[`pipeline`]**: one-call orchestration from records and edge batches
//!   to emitter-ready output with a full [`RunReport`].
//! - **[`emit`]**: the [`GraphRecordSink`] boundary the surrounding tooling
//!   implements against its storage backend.
//!
//! ## Getting Started
//!
//! ```
//! use bom_graph_tools::config::AppConfig;
//! use bom_graph_tools::model::{EdgeBatch, PartRecord, RawEdge};
//! use bom_graph_tools::pipeline;
//!
//! let records = vec![
//!     PartRecord::new("TOP", "Snowmobile"),
//!     PartRecord::new("E1", "Engine").with_revision("2"),
//!     PartRecord::new("F1", "Frame"),
//! ];
//! let batches = vec![EdgeBatch::names(vec![
//!     RawEdge::new("Snowmobile", "Engine"),
//!     RawEdge::new("Snowmobile", "Frame"),
//! ])];
//!
//! let output = pipeline::run(records, &batches, &AppConfig::default())?;
//! assert_eq!(output.direct_edges.len(), 2);
//! assert_eq!(output.reverse_edges.len(), 2);
//! println!("{}", output.report);
//! # Ok::<(), bom_graph_tools::pipeline::PipelineError>(())
//! ```
//!
//! ## Strict vs. lenient
//!
//! Under the default lenient policy a run always succeeds (absent a
//! structural cycle): unknown names drop their edge with a diagnostic,
//! ambiguous names are tie-broken deterministically. Under
//! [`ResolutionPolicy::strict`] any unknown or ambiguous token fails the run
//! with one aggregated error listing every offending token.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Variable names like `old`/`new` or `a`/`b` are clear in context
    clippy::similar_names
)]

pub mod config;
pub mod emit;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod resolve;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, DiagnosticsConfig, PipelineConfig, Validatable};
pub use emit::{ClosureRecord, CollectingSink, EdgeRecord, GraphRecordSink, JsonLinesSink, NodeRecord};
pub use error::{BomGraphError, ErrorContext, Result};
pub use graph::{BomGraph, ClosurePair, DirectEdge, GraphBuilder, GraphDiagnostics};
pub use model::{
    CrossRefIndex, EdgeBatch, EdgeMode, NameCandidate, PartId, PartMeta, PartRecord, RawEdge,
    XrefStats,
};
pub use pipeline::{GraphOutput, PipelineError};
pub use report::RunReport;
pub use resolve::{
    NameResolver, PolicyMode, ResolutionDiagnostics, ResolutionOutcome, ResolutionPolicy,
    ResolutionStatus, ResolvedEdge,
};
