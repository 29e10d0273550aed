use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// Outcome of one product within a reindex run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// None of the product's image references resolved to bytes.
    #[serde(rename = "skipped_no_images")]
    Skipped,
    Processed,
    Error,
}

/// Typed event emitted by a bulk reindex run.
///
/// Serializes as `{"type": "total", "value": 3}` and so on; the transport
/// layer only has to frame these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RebuildProgressEvent {
    Total {
        value: usize,
    },
    Progress {
        processed: usize,
        total: usize,
        current_product_id: ProductId,
        status: ProductStatus,
    },
    Complete {
        message: String,
        products_processed: usize,
        total_products_considered: usize,
        errors: Vec<String>,
    },
    Error {
        message: String,
    },
}

impl RebuildProgressEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}
