//! Structured log events for key system operations.

use lookalike_core::ids::{PersistentId, ProductId};
use lookalike_core::models::ProductStatus;

pub fn image_ingested(product_id: ProductId, persistent_id: PersistentId, replaced: bool) {
    tracing::info!(
        event = "image_ingested",
        product_id = %product_id,
        persistent_id = %persistent_id,
        replaced,
        "image ingested"
    );
}

pub fn reindex_started(total: usize) {
    tracing::info!(event = "reindex_started", total, "reindex started");
}

pub fn reindex_product_finished(product_id: ProductId, status: ProductStatus, indexed: usize) {
    tracing::debug!(
        event = "reindex_product_finished",
        product_id = %product_id,
        status = ?status,
        indexed,
        "reindex product finished"
    );
}

pub fn reindex_image_failed(product_id: ProductId, image_reference: &str, error: &str) {
    tracing::warn!(
        event = "reindex_image_failed",
        product_id = %product_id,
        image_reference = %image_reference,
        error = %error,
        "reindex image failed"
    );
}

pub fn reindex_completed(processed: usize, total: usize, errors: usize) {
    tracing::info!(
        event = "reindex_completed",
        processed,
        total,
        errors,
        "reindex completed"
    );
}

pub fn reindex_failed(error: &str) {
    tracing::error!(event = "reindex_failed", error = %error, "reindex failed");
}
