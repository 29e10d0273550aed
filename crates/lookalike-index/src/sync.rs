//! VectorStoreSync: keeps the flat index and its mapping consistent with
//! durable storage.
//!
//! One `RwLock` guards index and mapping together, so a reader never sees
//! one without the other. Loads build a fresh state off-lock and swap it
//! in. A writer gate serializes load/refresh/append so an append cannot
//! land in a state a concurrent load is about to replace.

use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use lookalike_core::errors::{IndexError, LookalikeError, LookalikeResult};
use lookalike_core::ids::{Ordinal, PersistentId};
use lookalike_core::traits::IVectorStorage;

use crate::flat::FlatIndex;
use crate::mapping::IndexMapping;

/// One raw neighbor, before product resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHit {
    pub ordinal: Ordinal,
    pub persistent_id: PersistentId,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub cardinality: usize,
    pub dimensions: usize,
    /// When the last full load completed. `None` before the first load.
    pub loaded_at: Option<DateTime<Utc>>,
}

struct IndexState {
    index: FlatIndex,
    mapping: IndexMapping,
    loaded_at: Option<DateTime<Utc>>,
}

pub struct VectorStoreSync {
    storage: Arc<dyn IVectorStorage>,
    dimensions: usize,
    state: RwLock<IndexState>,
    writer_gate: Mutex<()>,
}

impl VectorStoreSync {
    /// An empty synchronizer. Call [`load`](Self::load) to populate it.
    pub fn new(storage: Arc<dyn IVectorStorage>, dimensions: usize) -> Self {
        Self {
            storage,
            dimensions,
            state: RwLock::new(IndexState {
                index: FlatIndex::new(dimensions),
                mapping: IndexMapping::new(),
                loaded_at: None,
            }),
            writer_gate: Mutex::new(()),
        }
    }

    /// Rebuild index and mapping from every stored record, ascending by
    /// persistent id. On failure the previous state is left untouched.
    /// Returns the new cardinality.
    pub fn load(&self) -> LookalikeResult<usize> {
        let _gate = self.writer_gate.lock().map_err(poisoned)?;

        let records = self.storage.scan_ordered()?;
        let mut index = FlatIndex::with_capacity(self.dimensions, records.len());
        let mut mapping = IndexMapping::with_capacity(records.len());
        let mut skipped = 0usize;
        for record in &records {
            if record.vector.len() != self.dimensions {
                warn!(
                    persistent_id = %record.persistent_id,
                    expected = self.dimensions,
                    actual = record.vector.len(),
                    "skipping stored vector with wrong dimension"
                );
                skipped += 1;
                continue;
            }
            if mapping.push(record.persistent_id).is_some() {
                index.add(&record.vector)?;
            }
        }

        let cardinality = index.len();
        let fresh = IndexState {
            index,
            mapping,
            loaded_at: Some(Utc::now()),
        };
        *self.state.write().map_err(poisoned)? = fresh;

        info!(cardinality, skipped, "vector index loaded");
        Ok(cardinality)
    }

    /// Same as [`load`](Self::load).
    pub fn refresh(&self) -> LookalikeResult<usize> {
        self.load()
    }

    /// Add one vector at the next ordinal. An id that is already mapped
    /// is left alone and its existing ordinal returned.
    pub fn append(&self, vector: &[f32], persistent_id: PersistentId) -> LookalikeResult<Ordinal> {
        let _gate = self.writer_gate.lock().map_err(poisoned)?;
        let mut state = self.state.write().map_err(poisoned)?;

        if let Some(existing) = state.mapping.ordinal(persistent_id) {
            debug!(
                persistent_id = %persistent_id,
                ordinal = %existing,
                "append of mapped id ignored"
            );
            return Ok(existing);
        }
        let ordinal = state.index.add(vector)?;
        state.mapping.push(persistent_id);
        debug!(persistent_id = %persistent_id, ordinal = %ordinal, "vector appended");
        Ok(ordinal)
    }

    /// Up to `k` nearest neighbors of `query`, ascending by distance.
    pub fn search(&self, query: &[f32], k: usize) -> LookalikeResult<Vec<IndexHit>> {
        let state = self.state.read().map_err(poisoned)?;
        let raw = state.index.search(query, k)?;
        Ok(raw
            .into_iter()
            .filter_map(|(ordinal, distance)| {
                state.mapping.persistent_id(ordinal).map(|persistent_id| IndexHit {
                    ordinal,
                    persistent_id,
                    distance,
                })
            })
            .collect())
    }

    pub fn cardinality(&self) -> LookalikeResult<usize> {
        Ok(self.state.read().map_err(poisoned)?.index.len())
    }

    pub fn stats(&self) -> LookalikeResult<IndexStats> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(IndexStats {
            cardinality: state.index.len(),
            dimensions: self.dimensions,
            loaded_at: state.loaded_at,
        })
    }

    /// Persistent ids in ordinal order.
    pub fn mapping_snapshot(&self) -> LookalikeResult<Vec<PersistentId>> {
        Ok(self.state.read().map_err(poisoned)?.mapping.as_slice().to_vec())
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> LookalikeError {
    IndexError::LockPoisoned {
        details: e.to_string(),
    }
    .into()
}
