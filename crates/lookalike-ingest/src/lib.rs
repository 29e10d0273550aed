//! # lookalike-ingest
//!
//! Write paths into the vector store: one image at a time through
//! [`IngestionPipeline`], or every unindexed product through a
//! [`ReindexRun`] that yields progress events as it goes.

pub mod image_store;
pub mod pipeline;
pub mod reindex;
pub mod sse;

pub use image_store::FsImageStore;
pub use pipeline::{IngestOutcome, IngestionPipeline};
pub use reindex::{ReindexOrchestrator, ReindexRun};
