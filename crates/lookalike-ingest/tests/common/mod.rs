#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use lookalike_core::config::EmbeddingConfig;
use lookalike_core::retry::RetryPolicy;
use lookalike_embeddings::ImageEmbedder;
use lookalike_index::VectorStoreSync;
use lookalike_ingest::{IngestionPipeline, ReindexOrchestrator};
use lookalike_storage::StorageEngine;
use test_fixtures::{MemoryImageStore, ScriptedProvider};

pub const DIMS: usize = 8;

pub struct Harness {
    pub storage: Arc<StorageEngine>,
    pub index: Arc<VectorStoreSync>,
    pub provider: Arc<ScriptedProvider>,
    pub images: Arc<MemoryImageStore>,
    pub embedder: Arc<ImageEmbedder>,
}

impl Harness {
    pub fn new(provider: ScriptedProvider, retry: RetryPolicy) -> Self {
        let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
        let index = Arc::new(VectorStoreSync::new(storage.clone(), DIMS));
        index.load().unwrap();
        let provider = Arc::new(provider);
        let config = EmbeddingConfig {
            dimensions: DIMS,
            cache_capacity: 0,
            ..Default::default()
        };
        let embedder = Arc::new(
            ImageEmbedder::new(provider.clone(), &config, retry)
                .with_jitter(Duration::ZERO, Duration::ZERO)
                .with_sleeper(|_| {}),
        );
        Self {
            storage,
            index,
            provider,
            images: Arc::new(MemoryImageStore::new()),
            embedder,
        }
    }

    pub fn pipeline(&self) -> IngestionPipeline {
        IngestionPipeline::new(self.embedder.clone(), self.storage.clone(), self.index.clone())
    }

    pub fn orchestrator(&self) -> ReindexOrchestrator {
        ReindexOrchestrator::new(
            self.embedder.clone(),
            self.storage.clone(),
            self.storage.clone(),
            self.images.clone(),
            self.index.clone(),
        )
    }
}
