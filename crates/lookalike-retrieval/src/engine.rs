//! SimilarityResolver: raw neighbors → product-level results.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use lookalike_core::errors::LookalikeResult;
use lookalike_core::ids::PersistentId;
use lookalike_core::models::{SearchHit, VectorRecord};
use lookalike_core::traits::IVectorStorage;
use lookalike_embeddings::ImageEmbedder;
use lookalike_index::VectorStoreSync;

use crate::ranking::{self, distance_to_similarity};

pub struct SimilarityResolver {
    embedder: Arc<ImageEmbedder>,
    index: Arc<VectorStoreSync>,
    storage: Arc<dyn IVectorStorage>,
    max_top_k: usize,
}

impl SimilarityResolver {
    pub fn new(
        embedder: Arc<ImageEmbedder>,
        index: Arc<VectorStoreSync>,
        storage: Arc<dyn IVectorStorage>,
        max_top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            storage,
            max_top_k,
        }
    }

    /// Products whose images look most like `image_bytes`, at most `k`,
    /// best first, one entry per product.
    pub fn search(&self, image_bytes: &[u8], k: usize) -> LookalikeResult<Vec<SearchHit>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let query = self.embedder.extract(image_bytes)?;
        self.search_vector(&query, k)
    }

    /// [`search`](Self::search) for an already-extracted query vector.
    pub fn search_vector(&self, query: &[f32], k: usize) -> LookalikeResult<Vec<SearchHit>> {
        let k = k.min(self.max_top_k);
        if k == 0 {
            return Ok(Vec::new());
        }

        let neighbors = self.index.search(query, k)?;
        if neighbors.is_empty() {
            debug!("index empty, no neighbors");
            return Ok(Vec::new());
        }

        let ids: Vec<PersistentId> = neighbors.iter().map(|n| n.persistent_id).collect();
        let records: HashMap<PersistentId, VectorRecord> = self
            .storage
            .get_live_records(&ids)?
            .into_iter()
            .map(|r| (r.persistent_id, r))
            .collect();

        let mut hits = Vec::with_capacity(neighbors.len());
        let mut stale = 0usize;
        for neighbor in &neighbors {
            let Some(record) = records.get(&neighbor.persistent_id) else {
                stale += 1;
                continue;
            };
            let similarity = distance_to_similarity(neighbor.distance);
            debug!(
                ordinal = %neighbor.ordinal,
                persistent_id = %neighbor.persistent_id,
                product_id = %record.product_id,
                distance = neighbor.distance,
                similarity,
                "neighbor resolved"
            );
            hits.push(SearchHit {
                product_id: record.product_id,
                persistent_id: record.persistent_id,
                raw_distance: neighbor.distance,
                similarity_score: similarity,
                image_reference: record.image_reference.clone(),
                original_path: record.original_path.clone(),
                remote_reference: record.remote_reference.clone(),
            });
        }
        if stale > 0 {
            warn!(stale, "skipped neighbors with no live record");
        }

        let mut results = ranking::best_per_product(hits);
        ranking::rank(&mut results);
        info!(
            k,
            neighbors = neighbors.len(),
            products = results.len(),
            "similarity search complete"
        );
        Ok(results)
    }
}
