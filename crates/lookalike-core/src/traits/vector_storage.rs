use crate::errors::LookalikeResult;
use crate::ids::PersistentId;
use crate::models::{NewVectorRecord, Product, UpsertOutcome, VectorRecord};

/// Durable vector record storage.
pub trait IVectorStorage: Send + Sync {
    /// Upsert the product row, attach the image reference to it, and
    /// upsert the vector record keyed by image reference, all in one
    /// transaction.
    fn upsert_with_product(
        &self,
        product: &Product,
        record: &NewVectorRecord,
    ) -> LookalikeResult<UpsertOutcome>;

    /// Upsert a batch of records in one transaction. Nothing is written
    /// if any record fails.
    fn upsert_batch(&self, records: &[NewVectorRecord]) -> LookalikeResult<Vec<UpsertOutcome>>;

    /// Every record, ascending by persistent id.
    fn scan_ordered(&self) -> LookalikeResult<Vec<VectorRecord>>;

    fn get_record(&self, id: PersistentId) -> LookalikeResult<Option<VectorRecord>>;

    /// Records for the given ids whose owning product still exists.
    /// Unknown ids are silently absent from the result.
    fn get_live_records(&self, ids: &[PersistentId]) -> LookalikeResult<Vec<VectorRecord>>;

    fn count_records(&self) -> LookalikeResult<usize>;
}
