//! Dense node arena: identifier to integer handle interning.
//!
//! DFS and closure computation run on `u32` handles instead of hashing
//! identifier strings on every step; the arena owns the mapping both ways.

use crate::model::PartId;
use std::collections::HashMap;

/// Interns part identifiers into dense `u32` handles.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    ids: Vec<PartId>,
    lookup: HashMap<PartId, u32>,
}

impl NodeArena {
    /// Intern an identifier, returning its stable handle.
    pub fn intern(&mut self, id: &PartId) -> u32 {
        if let Some(&idx) = self.lookup.get(id) {
            return idx;
        }
        let idx = u32::try_from(self.ids.len()).expect("node count exceeds u32");
        self.ids.push(id.clone());
        self.lookup.insert(id.clone(), idx);
        idx
    }

    /// The identifier behind a handle.
    #[must_use]
    pub fn resolve(&self, idx: u32) -> &PartId {
        &self.ids[idx as usize]
    }

    /// Handle for an identifier, if interned.
    #[must_use]
    pub fn index_of(&self, id: &PartId) -> Option<u32> {
        self.lookup.get(id).copied()
    }

    /// Number of interned identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if nothing is interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// All interned identifiers in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &PartId> {
        self.ids.iter()
    }
}
