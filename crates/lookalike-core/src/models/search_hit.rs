use serde::{Deserialize, Serialize};

use crate::ids::{PersistentId, ProductId};

/// One product-level result of a visual similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub product_id: ProductId,
    pub persistent_id: PersistentId,
    /// Euclidean distance between the query and the stored vector.
    pub raw_distance: f32,
    /// `1 / (1 + raw_distance)`, in `(0, 1]`.
    pub similarity_score: f32,
    pub image_reference: String,
    pub original_path: Option<String>,
    pub remote_reference: Option<String>,
}
