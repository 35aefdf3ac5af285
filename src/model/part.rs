//! Part records and stable part identifiers.

use super::normalize::normalize_token;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable identifier for a part.
///
/// The identifier is the sole primary key of a part: two records carrying the
/// same identifier refer to the same part regardless of what their name
/// columns say. Construction normalizes the raw token (trim, whitespace
/// collapse, spreadsheet float-artifact stripping); equality and hashing
/// operate on the normalized value.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId {
    value: String,
}

impl PartId {
    /// Create a part identifier from a raw token.
    pub fn new(raw: &str) -> Self {
        Self {
            value: normalize_token(raw),
        }
    }

    /// The normalized identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// True if the raw token normalized to nothing (missing identifier).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl PartialEq for PartId {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Hash for PartId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for PartId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PartId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<&str> for PartId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Optional per-record metadata used for resolution tie-breaking and carried
/// through to the emitted node records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartMeta {
    /// Revision marker (e.g. `"1"`, `"B.2"`); compared with natural ordering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// View/context the record was captured in (e.g. `"Design"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Container/library the record belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Source batch or sheet the record came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl PartMeta {
    /// True if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revision.is_none()
            && self.view.is_none()
            && self.container.is_none()
            && self.source.is_none()
    }
}

/// One input row of part master data.
///
/// Records with a missing identifier are dropped (and counted) during index
/// construction; an empty display name keeps the part indexed by identifier
/// but out of the name cross-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecord {
    /// Raw identifier token as supplied upstream
    pub identifier: String,
    /// Display name; may be empty or shared across records
    pub name: String,
    /// Optional metadata bag
    #[serde(default)]
    pub meta: PartMeta,
}

impl PartRecord {
    /// Create a record with no metadata.
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            meta: PartMeta::default(),
        }
    }

    /// Set the revision marker.
    #[must_use]
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.meta.revision = Some(revision.into());
        self
    }

    /// Set the view.
    #[must_use]
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.meta.view = Some(view.into());
        self
    }

    /// Set the container.
    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.meta.container = Some(container.into());
        self
    }

    /// Set the source batch.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.meta.source = Some(source.into());
        self
    }

    /// Normalized identifier for this record.
    #[must_use]
    pub fn id(&self) -> PartId {
        PartId::new(&self.identifier)
    }
}
