use std::collections::VecDeque;

use tracing::{info, span::EnteredSpan, warn};
use uuid::Uuid;

use lookalike_core::constants::NOTHING_TO_INDEX_MESSAGE;
use lookalike_core::models::{NewVectorRecord, Product, ProductStatus, RebuildProgressEvent};
use lookalike_observability::{events, reindex_span};

use super::ReindexOrchestrator;

enum Phase {
    Scanning,
    Iterating,
    Completing,
    Done,
}

/// One bulk reindex run, yielding [`RebuildProgressEvent`]s.
pub struct ReindexRun {
    ctx: ReindexOrchestrator,
    run_id: Uuid,
    phase: Phase,
    queue: VecDeque<Product>,
    total: usize,
    processed: usize,
    errors: Vec<String>,
}

impl ReindexRun {
    pub(super) fn new(ctx: ReindexOrchestrator) -> Self {
        Self {
            ctx,
            run_id: Uuid::new_v4(),
            phase: Phase::Scanning,
            queue: VecDeque::new(),
            total: 0,
            processed: 0,
            errors: Vec::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    fn enter_span(&self) -> EnteredSpan {
        reindex_span!(self.run_id).entered()
    }

    fn scan(&mut self) -> RebuildProgressEvent {
        match self.ctx.catalog.products_pending_index() {
            Ok(products) => {
                self.total = products.len();
                self.queue = products.into();
                self.phase = if self.total == 0 {
                    Phase::Completing
                } else {
                    Phase::Iterating
                };
                events::reindex_started(self.total);
                RebuildProgressEvent::Total { value: self.total }
            }
            Err(e) => {
                self.phase = Phase::Done;
                let message = format!("reindex scan failed: {e}");
                events::reindex_failed(&message);
                RebuildProgressEvent::Error { message }
            }
        }
    }

    /// Extract every resolvable image of `product` and commit them in one
    /// transaction.
    fn process(&mut self, product: &Product) -> ProductStatus {
        let mut records = Vec::new();
        let mut failures = 0usize;

        for reference in &product.image_references {
            let image = match self.ctx.images.read(product.id, reference) {
                Ok(Some(image)) => image,
                Ok(None) => {
                    warn!(product_id = %product.id, reference, "image reference did not resolve");
                    continue;
                }
                Err(e) => {
                    self.image_failed(product, reference, &e.to_string());
                    failures += 1;
                    continue;
                }
            };
            match self.ctx.embedder.extract(&image.bytes) {
                Ok(vector) => records.push(
                    NewVectorRecord::new(product.id, reference.as_str(), vector)
                        .with_original_path(image.original_path),
                ),
                Err(e) => {
                    self.image_failed(product, reference, &e.to_string());
                    failures += 1;
                }
            }
        }

        let mut indexed = 0;
        if !records.is_empty() {
            match self.ctx.storage.upsert_batch(&records) {
                Ok(outcomes) => indexed = outcomes.len(),
                Err(e) => {
                    let reason = format!("commit rolled back: {e}");
                    for record in &records {
                        self.image_failed(product, &record.image_reference, &reason);
                    }
                    failures += records.len();
                }
            }
        }

        let status = if failures > 0 {
            ProductStatus::Error
        } else if indexed == 0 {
            ProductStatus::Skipped
        } else {
            ProductStatus::Processed
        };
        events::reindex_product_finished(product.id, status, indexed);
        status
    }

    fn image_failed(&mut self, product: &Product, reference: &str, error: &str) {
        events::reindex_image_failed(product.id, reference, error);
        self.errors.push(format!(
            "product {} ({}) image {reference}: {error}",
            product.id, product.name
        ));
    }

    fn complete(&mut self) -> RebuildProgressEvent {
        self.phase = Phase::Done;
        if self.total == 0 {
            return RebuildProgressEvent::Complete {
                message: NOTHING_TO_INDEX_MESSAGE.to_string(),
                products_processed: 0,
                total_products_considered: 0,
                errors: Vec::new(),
            };
        }

        match self.ctx.index.refresh() {
            Ok(cardinality) => info!(cardinality, "index refreshed after reindex"),
            Err(e) => self.errors.push(format!("index refresh failed: {e}")),
        }
        events::reindex_completed(self.processed, self.total, self.errors.len());

        let mut message = format!(
            "vector index build complete: {} of {} products processed",
            self.processed, self.total
        );
        if !self.errors.is_empty() {
            message.push_str(&format!(", {} errors", self.errors.len()));
        }
        RebuildProgressEvent::Complete {
            message,
            products_processed: self.processed,
            total_products_considered: self.total,
            errors: std::mem::take(&mut self.errors),
        }
    }
}

impl Iterator for ReindexRun {
    type Item = RebuildProgressEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let _span = self.enter_span();
        match self.phase {
            Phase::Done => None,
            Phase::Scanning => Some(self.scan()),
            Phase::Completing => Some(self.complete()),
            Phase::Iterating => match self.queue.pop_front() {
                Some(product) => {
                    let status = self.process(&product);
                    self.processed += 1;
                    Some(RebuildProgressEvent::Progress {
                        processed: self.processed,
                        total: self.total,
                        current_product_id: product.id,
                        status,
                    })
                }
                None => Some(self.complete()),
            },
        }
    }
}
