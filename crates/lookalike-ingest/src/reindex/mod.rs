//! Bulk reindex of every product that has images but no vector records.
//!
//! ```text
//! Scanning ──fail──▶ error{message} ▶ done
//!    │
//!    ▼
//! total{n} ──n=0──▶ complete{"all products already indexed"} ▶ done
//!    │
//!    ▼
//! progress{..} × n ──▶ refresh ──▶ complete{..} ▶ done
//! ```
//!
//! [`ReindexRun`] is a lazy iterator: each event is produced right before
//! the blocking work for the next one starts, and dropping the run
//! between events cancels it. Records committed so far stay, and the next
//! run picks up where this one stopped because the scan only returns
//! products without records.

mod run;

use std::sync::Arc;

use lookalike_core::traits::{ICatalog, IImageStore, IVectorStorage};
use lookalike_embeddings::ImageEmbedder;
use lookalike_index::VectorStoreSync;

pub use run::ReindexRun;

/// Everything a run needs, shareable across runs.
#[derive(Clone)]
pub struct ReindexOrchestrator {
    embedder: Arc<ImageEmbedder>,
    catalog: Arc<dyn ICatalog>,
    storage: Arc<dyn IVectorStorage>,
    images: Arc<dyn IImageStore>,
    index: Arc<VectorStoreSync>,
}

impl ReindexOrchestrator {
    pub fn new(
        embedder: Arc<ImageEmbedder>,
        catalog: Arc<dyn ICatalog>,
        storage: Arc<dyn IVectorStorage>,
        images: Arc<dyn IImageStore>,
        index: Arc<VectorStoreSync>,
    ) -> Self {
        Self {
            embedder,
            catalog,
            storage,
            images,
            index,
        }
    }

    /// Start a run. Nothing happens until the first event is pulled.
    pub fn run(&self) -> ReindexRun {
        ReindexRun::new(self.clone())
    }
}
