use crate::errors::LookalikeResult;
use crate::ids::ProductId;
use crate::models::Product;

/// Product catalog surface the search subsystem consumes.
pub trait ICatalog: Send + Sync {
    /// Insert or update a product and replace its image reference list.
    fn upsert_product(&self, product: &Product) -> LookalikeResult<()>;
    fn get_product(&self, id: ProductId) -> LookalikeResult<Option<Product>>;
    /// Delete a product and, by cascade, its vector records. Returns
    /// whether the product existed.
    fn delete_product(&self, id: ProductId) -> LookalikeResult<bool>;
    fn image_references(&self, id: ProductId) -> LookalikeResult<Vec<String>>;
    /// Products with at least one image reference and no vector record,
    /// ascending by id.
    fn products_pending_index(&self) -> LookalikeResult<Vec<Product>>;
}
