use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// A catalog product as seen by the search subsystem.
///
/// Only the fields the core needs: identity, a display name, and the
/// ordered list of image references attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image_references: Vec<String>,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_references: Vec::new(),
        }
    }

    /// Builder-style helper to attach image references.
    pub fn with_images<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_references
            .extend(references.into_iter().map(Into::into));
        self
    }
}
