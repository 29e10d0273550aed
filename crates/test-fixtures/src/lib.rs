//! Shared test doubles and fixtures for the Lookalike workspace.
//!
//! Scripted embedding providers, synthetic images, deterministic unit
//! vectors, an in-memory image store, and the JSON catalog fixtures under
//! `fixtures/`.

mod images;
mod providers;
mod vectors;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use lookalike_core::errors::LookalikeResult;
use lookalike_core::ids::ProductId;
use lookalike_core::models::{Product, ResolvedImage};
use lookalike_core::traits::IImageStore;

pub use images::{png_bytes, solid_png};
pub use providers::{rate_limited, ConstantProvider, ScriptedProvider, ScriptedResponse};
pub use vectors::{axis_vector, blend, unit_vector};

/// Root directory of this crate's `fixtures/` folder.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<Product>,
}

/// Products from `catalog/small_catalog.json`.
pub fn small_catalog() -> Vec<Product> {
    load_fixture::<CatalogFixture>("catalog/small_catalog.json").products
}

/// `IImageStore` over a map of `(product, reference) -> bytes`.
/// References not inserted resolve to `None`.
#[derive(Default)]
pub struct MemoryImageStore {
    images: Mutex<HashMap<(ProductId, String), Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product_id: ProductId, reference: &str, bytes: Vec<u8>) {
        self.images
            .lock()
            .unwrap()
            .insert((product_id, reference.to_string()), bytes);
    }
}

impl IImageStore for MemoryImageStore {
    fn read(
        &self,
        product_id: ProductId,
        reference: &str,
    ) -> LookalikeResult<Option<ResolvedImage>> {
        let images = self.images.lock().unwrap();
        Ok(images
            .get(&(product_id, reference.to_string()))
            .map(|bytes| ResolvedImage {
                bytes: bytes.clone(),
                original_path: Some(format!("memory://{product_id}/{reference}")),
            }))
    }
}
