use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{PersistentId, ProductId};

/// A durable image embedding owned by a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub persistent_id: PersistentId,
    pub product_id: ProductId,
    pub vector: Vec<f32>,
    /// Unique key: at most one record per image reference.
    pub image_reference: String,
    /// Filesystem path the image bytes were read from, if known.
    pub original_path: Option<String>,
    /// Remote object-storage reference, if the image was uploaded.
    pub remote_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A vector record before storage has assigned its persistent id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVectorRecord {
    pub product_id: ProductId,
    pub vector: Vec<f32>,
    pub image_reference: String,
    pub original_path: Option<String>,
    pub remote_reference: Option<String>,
}

impl NewVectorRecord {
    pub fn new(
        product_id: ProductId,
        image_reference: impl Into<String>,
        vector: Vec<f32>,
    ) -> Self {
        Self {
            product_id,
            vector,
            image_reference: image_reference.into(),
            original_path: None,
            remote_reference: None,
        }
    }

    pub fn with_original_path(mut self, path: Option<String>) -> Self {
        self.original_path = path;
        self
    }

    pub fn with_remote_reference(mut self, reference: Option<String>) -> Self {
        self.remote_reference = reference;
        self
    }
}

/// Result of writing a record keyed by its image reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub persistent_id: PersistentId,
    /// True when an existing record with the same image reference was
    /// replaced rather than a new one created.
    pub replaced: bool,
}
