//! Filesystem image store.
//!
//! A reference like `/uploads/good_images/12/ab12.jpg` resolves to
//! `<root>/good_images/<product_id>/<file name>`; only the file name of
//! the reference is used.

use std::path::{Path, PathBuf};

use tracing::debug;

use lookalike_core::errors::{LookalikeError, LookalikeResult};
use lookalike_core::ids::ProductId;
use lookalike_core::models::ResolvedImage;
use lookalike_core::traits::IImageStore;

const IMAGE_DIR: &str = "good_images";

pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `reference` lives for `product_id`. `None` if the reference
    /// has no file name component.
    pub fn resolve_path(&self, product_id: ProductId, reference: &str) -> Option<PathBuf> {
        let file_name = Path::new(reference.trim_end_matches('/')).file_name()?;
        Some(
            self.root
                .join(IMAGE_DIR)
                .join(product_id.to_string())
                .join(file_name),
        )
    }
}

impl IImageStore for FsImageStore {
    fn read(
        &self,
        product_id: ProductId,
        reference: &str,
    ) -> LookalikeResult<Option<ResolvedImage>> {
        let Some(path) = self.resolve_path(product_id, reference) else {
            return Ok(None);
        };
        if !path.is_file() {
            debug!(path = %path.display(), reference, "image file not found");
            return Ok(None);
        }
        let bytes = std::fs::read(&path).map_err(|e| LookalikeError::ImageNotFound {
            reference: format!("{}: {e}", path.display()),
        })?;
        Ok(Some(ResolvedImage {
            bytes,
            original_path: Some(path.to_string_lossy().into_owned()),
        }))
    }
}
