//! Ordinal → persistent id mapping.

use std::collections::HashMap;

use lookalike_core::ids::{Ordinal, PersistentId};

/// Ordered `ordinal → persistent_id` with a reverse lookup. A persistent
/// id appears at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexMapping {
    ids: Vec<PersistentId>,
    reverse: HashMap<PersistentId, Ordinal>,
}

impl IndexMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            reverse: HashMap::with_capacity(capacity),
        }
    }

    /// Map `id` to the next ordinal. Returns `None` if `id` is already mapped.
    pub fn push(&mut self, id: PersistentId) -> Option<Ordinal> {
        if self.reverse.contains_key(&id) {
            return None;
        }
        let ordinal = Ordinal(self.ids.len());
        self.ids.push(id);
        self.reverse.insert(id, ordinal);
        Some(ordinal)
    }

    pub fn persistent_id(&self, ordinal: Ordinal) -> Option<PersistentId> {
        self.ids.get(ordinal.0).copied()
    }

    pub fn ordinal(&self, id: PersistentId) -> Option<Ordinal> {
        self.reverse.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Persistent ids in ordinal order.
    pub fn as_slice(&self) -> &[PersistentId] {
        &self.ids
    }
}
