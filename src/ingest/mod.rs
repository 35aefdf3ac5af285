//! Hierarchy extraction from level-annotated BOM rows.
//!
//! Indented BOM exports encode the assembly tree as a `level` integer per
//! row: a row at level `n` is a child of the nearest preceding row at level
//! `n - 1`. This module walks such rows with a level stack and produces
//! identifier-mode raw edges. Parsing the tabular file itself belongs to the
//! upstream collaborator; this operates on already-extracted pairs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{normalize_token, RawEdge};

/// One already-parsed row of a level-annotated BOM export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRow {
    /// Part identifier token
    pub identifier: String,
    /// Indentation level; 0 is the top of an assembly
    pub level: u32,
}

impl LevelRow {
    /// Create a row.
    pub fn new(identifier: impl Into<String>, level: u32) -> Self {
        Self {
            identifier: identifier.into(),
            level,
        }
    }
}

/// Convert level-annotated rows into parent/child identifier edges.
///
/// Rows with an empty identifier are skipped. A row whose parent level is
/// absent (a gap in the indentation) produces no edge but still becomes the
/// current occupant of its level, matching how indented exports are read by
/// eye. Deeper levels are cleared whenever the walk moves back up.
#[must_use]
pub fn edges_from_levels(rows: &[LevelRow]) -> Vec<RawEdge> {
    let mut level_stack: BTreeMap<u32, String> = BTreeMap::new();
    let mut edges = Vec::new();
    let mut skipped = 0usize;

    for row in rows {
        let identifier = normalize_token(&row.identifier);
        if identifier.is_empty() {
            skipped += 1;
            continue;
        }

        // Clear everything deeper than this row before linking
        let _ = level_stack.split_off(&(row.level + 1));
        if row.level > 0 {
            if let Some(parent) = level_stack.get(&(row.level - 1)) {
                edges.push(RawEdge::new(parent.clone(), identifier.clone()));
            }
        }
        level_stack.insert(row.level, identifier);
    }

    if skipped > 0 {
        tracing::debug!(skipped, "level rows without identifier skipped");
    }
    tracing::debug!(edges = edges.len(), rows = rows.len(), "level hierarchy extracted");
    edges
}
