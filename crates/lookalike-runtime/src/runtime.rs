//! LookalikeRuntime: owns storage, embedder, index, resolver, ingestion
//! and reindex, wired from one `LookalikeConfig`.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use lookalike_core::config::LookalikeConfig;
use lookalike_core::errors::{LookalikeError, LookalikeResult};
use lookalike_core::ids::ProductId;
use lookalike_core::models::{Product, RebuildProgressEvent, ResolvedImage, SearchHit};
use lookalike_core::traits::{ICatalog, IEmbeddingProvider, IImageStore};
use lookalike_embeddings::{providers, ImageEmbedder};
use lookalike_index::{IndexStats, VectorStoreSync};
use lookalike_ingest::{
    FsImageStore, IngestOutcome, IngestionPipeline, ReindexOrchestrator, ReindexRun,
};
use lookalike_retrieval::SimilarityResolver;
use lookalike_storage::StorageEngine;

/// Options for constructing the runtime.
#[derive(Default)]
pub struct RuntimeOptions {
    /// SQLite database path. Overrides `storage.db_path` from config.
    pub db_path: Option<PathBuf>,
    /// TOML configuration. Defaults apply when `None`.
    pub config_toml: Option<String>,
    /// Embedding provider. When `None`, the HTTP provider is built from
    /// `[embedding]` config.
    pub provider: Option<Arc<dyn IEmbeddingProvider>>,
    /// Image byte store. When `None`, a filesystem store rooted at
    /// `reindex.image_root`.
    pub image_store: Option<Arc<dyn IImageStore>>,
}

/// A reindex run executing on a blocking thread.
pub struct ReindexHandle {
    pub run_id: Uuid,
    /// Progress events. Dropping the receiver cancels the run after the
    /// product in flight.
    pub events: mpsc::Receiver<RebuildProgressEvent>,
    pub task: JoinHandle<()>,
}

pub struct LookalikeRuntime {
    config: LookalikeConfig,
    storage: Arc<StorageEngine>,
    index: Arc<VectorStoreSync>,
    images: Arc<dyn IImageStore>,
    resolver: SimilarityResolver,
    pipeline: IngestionPipeline,
    orchestrator: ReindexOrchestrator,
}

impl LookalikeRuntime {
    /// Open storage, build the engines and load the index.
    pub fn new(opts: RuntimeOptions) -> LookalikeResult<Self> {
        let config = match &opts.config_toml {
            Some(toml_str) => LookalikeConfig::from_toml(toml_str)?,
            None => LookalikeConfig::default(),
        };

        let storage = Arc::new(match &opts.db_path {
            Some(path) => StorageEngine::open(path, config.storage.read_pool_size)?,
            None => StorageEngine::from_config(&config.storage)?,
        });

        let provider = match opts.provider {
            Some(provider) => provider,
            None => providers::create_provider(&config.embedding)?,
        };
        if provider.dimensions() != config.embedding.dimensions {
            return Err(LookalikeError::ConfigError(format!(
                "provider {} produces {} dimensions, config expects {}",
                provider.name(),
                provider.dimensions(),
                config.embedding.dimensions
            )));
        }
        let embedder = Arc::new(ImageEmbedder::from_config(provider, &config));

        let index = Arc::new(VectorStoreSync::new(
            storage.clone(),
            config.embedding.dimensions,
        ));
        index.load()?;

        let images: Arc<dyn IImageStore> = match opts.image_store {
            Some(store) => store,
            None => Arc::new(FsImageStore::new(&config.reindex.image_root)),
        };

        let resolver = SimilarityResolver::new(
            embedder.clone(),
            index.clone(),
            storage.clone(),
            config.search.max_top_k,
        );
        let pipeline = IngestionPipeline::new(embedder.clone(), storage.clone(), index.clone());
        let orchestrator = ReindexOrchestrator::new(
            embedder.clone(),
            storage.clone(),
            storage.clone(),
            images.clone(),
            index.clone(),
        );

        info!(
            version = lookalike_core::constants::VERSION,
            provider = embedder.provider_name(),
            dims = config.embedding.dimensions,
            "LookalikeRuntime initialized"
        );
        Ok(Self {
            config,
            storage,
            index,
            images,
            resolver,
            pipeline,
            orchestrator,
        })
    }

    /// Install the global tracing subscriber from `[observability]`.
    pub fn init_tracing(&self) -> LookalikeResult<()> {
        lookalike_observability::init_tracing(&self.config.observability)
    }

    pub fn config(&self) -> &LookalikeConfig {
        &self.config
    }

    /// The storage engine, which is also the product catalog.
    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    pub fn index(&self) -> &Arc<VectorStoreSync> {
        &self.index
    }

    /// Add one image to storage and the index.
    pub fn ingest(
        &self,
        product: &Product,
        image_reference: &str,
        image: &ResolvedImage,
    ) -> LookalikeResult<IngestOutcome> {
        self.pipeline.add(product, image_reference, image)
    }

    /// Ingest an image of a catalog product that is already present in
    /// the image store.
    pub fn ingest_reference(
        &self,
        product_id: ProductId,
        image_reference: &str,
    ) -> LookalikeResult<IngestOutcome> {
        let product = self
            .storage
            .get_product(product_id)?
            .ok_or(LookalikeError::ProductNotFound { id: product_id })?;
        let image = self
            .images
            .read(product.id, image_reference)?
            .ok_or_else(|| LookalikeError::ImageNotFound {
                reference: image_reference.to_string(),
            })?;
        self.pipeline.add(&product, image_reference, &image)
    }

    /// Visually similar products. `k` defaults to `search.default_top_k`
    /// and is capped at `search.max_top_k`.
    pub fn search(&self, image_bytes: &[u8], k: Option<usize>) -> LookalikeResult<Vec<SearchHit>> {
        let k = k.unwrap_or(self.config.search.default_top_k);
        let span = lookalike_observability::search_span!(k);
        let _guard = span.enter();
        self.resolver.search(image_bytes, k)
    }

    pub fn search_vector(&self, query: &[f32], k: usize) -> LookalikeResult<Vec<SearchHit>> {
        self.resolver.search_vector(query, k)
    }

    /// Rebuild the index from storage.
    pub fn refresh(&self) -> LookalikeResult<usize> {
        self.index.refresh()
    }

    pub fn stats(&self) -> LookalikeResult<IndexStats> {
        self.index.stats()
    }

    /// A lazy reindex run on the calling thread.
    pub fn reindex(&self) -> ReindexRun {
        self.orchestrator.run()
    }

    /// Run a reindex on tokio's blocking pool, forwarding events through a
    /// bounded channel of `capacity` (at least 1). Must be called from
    /// within a tokio runtime.
    pub fn spawn_reindex(&self, capacity: usize) -> ReindexHandle {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let run = self.orchestrator.run();
        let run_id = run.run_id();

        let task = tokio::task::spawn_blocking(move || {
            for event in run {
                if tx.blocking_send(event).is_err() {
                    debug!(%run_id, "progress receiver dropped, reindex cancelled");
                    return;
                }
            }
        });
        ReindexHandle {
            run_id,
            events: rx,
            task,
        }
    }
}
