//! Vector record storage: upsert semantics, ordering, liveness.

use lookalike_core::ids::{PersistentId, ProductId};
use lookalike_core::models::{NewVectorRecord, Product};
use lookalike_core::traits::{ICatalog, IVectorStorage};
use lookalike_storage::StorageEngine;
use test_fixtures::unit_vector;

fn record(product: i64, reference: &str, seed: u64) -> NewVectorRecord {
    NewVectorRecord::new(ProductId(product), reference, unit_vector(seed, 8))
}

#[test]
fn persistent_ids_are_monotonic() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let product = Product::new(1, "chair");
    let a = storage
        .upsert_with_product(&product, &record(1, "a.png", 1))
        .unwrap();
    let b = storage
        .upsert_with_product(&product, &record(1, "b.png", 2))
        .unwrap();
    assert!(!a.replaced && !b.replaced);
    assert!(b.persistent_id > a.persistent_id);
}

#[test]
fn reingesting_a_reference_replaces_in_place() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let product = Product::new(1, "chair");
    let first = storage
        .upsert_with_product(&product, &record(1, "a.png", 1))
        .unwrap();
    let second = storage
        .upsert_with_product(&product, &record(1, "a.png", 2))
        .unwrap();

    assert!(second.replaced);
    assert_eq!(second.persistent_id, first.persistent_id);
    assert_eq!(storage.count_records().unwrap(), 1);
    let stored = storage.get_record(first.persistent_id).unwrap().unwrap();
    assert_eq!(stored.vector, unit_vector(2, 8));
}

#[test]
fn reingest_keeps_stored_paths_it_does_not_supply() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let product = Product::new(1, "chair");
    let first = storage
        .upsert_with_product(
            &product,
            &record(1, "a.png", 1)
                .with_original_path(Some("/images/1/a.png".into()))
                .with_remote_reference(Some("bucket/1/a.png".into())),
        )
        .unwrap();
    storage
        .upsert_with_product(&product, &record(1, "a.png", 2))
        .unwrap();

    let stored = storage.get_record(first.persistent_id).unwrap().unwrap();
    assert_eq!(stored.vector, unit_vector(2, 8));
    assert_eq!(stored.original_path.as_deref(), Some("/images/1/a.png"));
    assert_eq!(stored.remote_reference.as_deref(), Some("bucket/1/a.png"));

    storage
        .upsert_with_product(
            &product,
            &record(1, "a.png", 3).with_remote_reference(Some("bucket/1/a-v2.png".into())),
        )
        .unwrap();
    let stored = storage.get_record(first.persistent_id).unwrap().unwrap();
    assert_eq!(stored.remote_reference.as_deref(), Some("bucket/1/a-v2.png"));
}

#[test]
fn upsert_with_product_attaches_reference() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let product = Product::new(4, "lamp").with_images(["x.png"]);
    storage
        .upsert_with_product(&product, &record(4, "y.png", 1))
        .unwrap();

    let stored = storage.get_product(ProductId(4)).unwrap().unwrap();
    assert_eq!(stored.name, "lamp");
    assert_eq!(stored.image_references, vec!["x.png", "y.png"]);
}

#[test]
fn scan_is_ordered_by_persistent_id() {
    let storage = StorageEngine::open_in_memory().unwrap();
    storage.upsert_product(&Product::new(1, "a")).unwrap();
    storage.upsert_product(&Product::new(2, "b")).unwrap();
    let outcomes = storage
        .upsert_batch(&[record(2, "z.png", 1), record(1, "a.png", 2), record(2, "m.png", 3)])
        .unwrap();

    let scanned: Vec<PersistentId> = storage
        .scan_ordered()
        .unwrap()
        .into_iter()
        .map(|r| r.persistent_id)
        .collect();
    let mut expected: Vec<PersistentId> = outcomes.iter().map(|o| o.persistent_id).collect();
    expected.sort();
    assert_eq!(scanned, expected);
}

#[test]
fn failed_batch_writes_nothing() {
    let storage = StorageEngine::open_in_memory().unwrap();
    storage.upsert_product(&Product::new(1, "a")).unwrap();
    // Product 99 does not exist: the foreign key rejects the second record.
    let result = storage.upsert_batch(&[record(1, "a.png", 1), record(99, "b.png", 2)]);
    assert!(result.is_err());
    assert_eq!(storage.count_records().unwrap(), 0);
}

#[test]
fn deleting_a_product_cascades_to_its_records() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let kept = storage
        .upsert_with_product(&Product::new(1, "kept"), &record(1, "k.png", 1))
        .unwrap();
    let gone = storage
        .upsert_with_product(&Product::new(2, "gone"), &record(2, "g.png", 2))
        .unwrap();

    assert!(storage.delete_product(ProductId(2)).unwrap());
    assert!(!storage.delete_product(ProductId(2)).unwrap());

    let live = storage
        .get_live_records(&[gone.persistent_id, kept.persistent_id, PersistentId(12345)])
        .unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].persistent_id, kept.persistent_id);
    assert!(storage.get_record(gone.persistent_id).unwrap().is_none());
}

#[test]
fn pending_index_lists_unindexed_products_with_images() {
    let storage = StorageEngine::open_in_memory().unwrap();
    for product in test_fixtures::small_catalog() {
        storage.upsert_product(&product).unwrap();
    }
    let pending: Vec<ProductId> = storage
        .products_pending_index()
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(pending, vec![ProductId(1), ProductId(2)]);

    storage
        .upsert_batch(&[record(1, "table_front.png", 1)])
        .unwrap();
    let pending = storage.products_pending_index().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, ProductId(2));
    assert_eq!(pending[0].image_references, vec!["armchair.png"]);
}

#[test]
fn upsert_product_replaces_reference_list() {
    let storage = StorageEngine::open_in_memory().unwrap();
    storage
        .upsert_product(&Product::new(1, "a").with_images(["one.png", "two.png"]))
        .unwrap();
    storage
        .upsert_product(&Product::new(1, "a2").with_images(["three.png"]))
        .unwrap();
    let product = storage.get_product(ProductId(1)).unwrap().unwrap();
    assert_eq!(product.name, "a2");
    assert_eq!(product.image_references, vec!["three.png"]);
}
