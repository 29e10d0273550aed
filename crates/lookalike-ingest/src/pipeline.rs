//! IngestionPipeline: one new image into durable storage and the index.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use lookalike_core::errors::LookalikeResult;
use lookalike_core::ids::{Ordinal, PersistentId};
use lookalike_core::models::{NewVectorRecord, Product, ResolvedImage};
use lookalike_core::traits::IVectorStorage;
use lookalike_embeddings::ImageEmbedder;
use lookalike_index::VectorStoreSync;
use lookalike_observability::{events, ingest_span};

/// What one `add` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestOutcome {
    pub persistent_id: PersistentId,
    /// Ordinal assigned in the live index. `None` when an existing record
    /// was replaced; the index picks up the new vector on the next refresh.
    pub ordinal: Option<Ordinal>,
    pub replaced: bool,
}

pub struct IngestionPipeline {
    embedder: Arc<ImageEmbedder>,
    storage: Arc<dyn IVectorStorage>,
    index: Arc<VectorStoreSync>,
}

impl IngestionPipeline {
    pub fn new(
        embedder: Arc<ImageEmbedder>,
        storage: Arc<dyn IVectorStorage>,
        index: Arc<VectorStoreSync>,
    ) -> Self {
        Self {
            embedder,
            storage,
            index,
        }
    }

    /// Extract, persist (product row, image reference and vector record
    /// in one transaction), then append to the index.
    ///
    /// Extraction or storage failure leaves storage and index untouched.
    pub fn add(
        &self,
        product: &Product,
        image_reference: &str,
        image: &ResolvedImage,
    ) -> LookalikeResult<IngestOutcome> {
        let span = ingest_span!(product.id, image_reference);
        let _guard = span.enter();

        let vector = self.embedder.extract(&image.bytes)?;
        let record = NewVectorRecord::new(product.id, image_reference, vector)
            .with_original_path(image.original_path.clone());
        let upsert = self.storage.upsert_with_product(product, &record)?;

        let ordinal = if upsert.replaced {
            debug!(
                persistent_id = %upsert.persistent_id,
                "record replaced in place, index catches up on refresh"
            );
            None
        } else {
            Some(self.index.append(&record.vector, upsert.persistent_id)?)
        };

        events::image_ingested(product.id, upsert.persistent_id, upsert.replaced);
        Ok(IngestOutcome {
            persistent_id: upsert.persistent_id,
            ordinal,
            replaced: upsert.replaced,
        })
    }
}
