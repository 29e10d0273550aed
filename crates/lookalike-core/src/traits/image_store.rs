use crate::errors::LookalikeResult;
use crate::ids::ProductId;
use crate::models::ResolvedImage;

/// Image byte storage, read by reference.
pub trait IImageStore: Send + Sync {
    /// Read the bytes behind `reference`. `Ok(None)` means the reference
    /// does not resolve to a file; errors are I/O failures on a file that
    /// does exist.
    fn read(
        &self,
        product_id: ProductId,
        reference: &str,
    ) -> LookalikeResult<Option<ResolvedImage>>;
}
