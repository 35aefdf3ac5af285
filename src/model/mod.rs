//! Core data model: part records, identifiers, and the cross-reference index.

pub mod normalize;
mod part;
mod xref;

pub use normalize::{fold_token, normalize_token};
pub use part::{PartId, PartMeta, PartRecord};
pub use xref::{CrossRefIndex, NameCandidate, XrefStats};

use serde::{Deserialize, Serialize};

/// A raw relationship row: parent token and child token.
///
/// Whether the tokens are identifiers or names is a property of the batch the
/// edge arrived in, never of the individual edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawEdge {
    /// Parent-side token
    pub parent: String,
    /// Child-side token
    pub child: String,
}

impl RawEdge {
    /// Create a raw edge.
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

/// Token interpretation for a whole edge batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeMode {
    /// Tokens are part identifiers; edges pass through resolution unchanged
    Identifier,
    /// Tokens are display names; edges go through name resolution
    Name,
}

/// One homogeneous batch of raw edges.
///
/// Identifier and name tokens are never mixed within a batch; sources that
/// produce both deliver two batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeBatch {
    /// How every token in this batch is interpreted
    pub mode: EdgeMode,
    /// The edges
    pub edges: Vec<RawEdge>,
    /// Optional label naming the upstream source, used in diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl EdgeBatch {
    /// Create a batch of identifier-mode edges.
    pub fn identifiers(edges: Vec<RawEdge>) -> Self {
        Self {
            mode: EdgeMode::Identifier,
            edges,
            source: None,
        }
    }

    /// Create a batch of name-mode edges.
    pub fn names(edges: Vec<RawEdge>) -> Self {
        Self {
            mode: EdgeMode::Name,
            edges,
            source: None,
        }
    }

    /// Attach a source label.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
