//! Resolver scenarios over real storage and index.

use std::sync::Arc;
use std::time::Duration;

use lookalike_core::config::EmbeddingConfig;
use lookalike_core::ids::{PersistentId, ProductId};
use lookalike_core::models::{NewVectorRecord, Product};
use lookalike_core::retry::RetryPolicy;
use lookalike_core::traits::{ICatalog, IVectorStorage};
use lookalike_embeddings::ImageEmbedder;
use lookalike_index::VectorStoreSync;
use lookalike_retrieval::SimilarityResolver;
use lookalike_storage::StorageEngine;
use test_fixtures::{axis_vector, blend, png_bytes, ScriptedProvider};

const DIMS: usize = 8;

struct Fixture {
    storage: Arc<StorageEngine>,
    index: Arc<VectorStoreSync>,
    provider: Arc<ScriptedProvider>,
    resolver: SimilarityResolver,
}

fn fixture(query_vector: Vec<f32>) -> Fixture {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let index = Arc::new(VectorStoreSync::new(storage.clone(), DIMS));
    let provider = Arc::new(ScriptedProvider::new(query_vector));
    let config = EmbeddingConfig {
        dimensions: DIMS,
        cache_capacity: 0,
        ..Default::default()
    };
    let embedder = Arc::new(
        ImageEmbedder::new(provider.clone(), &config, RetryPolicy::none())
            .with_jitter(Duration::ZERO, Duration::ZERO)
            .with_sleeper(|_| {}),
    );
    let resolver = SimilarityResolver::new(embedder, index.clone(), storage.clone(), 100);
    Fixture {
        storage,
        index,
        provider,
        resolver,
    }
}

impl Fixture {
    fn add(&self, product: i64, reference: &str, vector: Vec<f32>) -> PersistentId {
        let outcome = self
            .storage
            .upsert_with_product(
                &Product::new(product, format!("product {product}")),
                &NewVectorRecord::new(ProductId(product), reference, vector.clone()),
            )
            .unwrap();
        self.index.append(&vector, outcome.persistent_id).unwrap();
        outcome.persistent_id
    }
}

#[test]
fn empty_index_returns_no_results() {
    let f = fixture(axis_vector(0, DIMS));
    f.index.load().unwrap();
    assert!(f.resolver.search(&png_bytes(16, 16, 1), 5).unwrap().is_empty());
}

#[test]
fn three_vectors_two_products_dedup() {
    let f = fixture(axis_vector(0, DIMS));
    f.add(1, "a1.png", axis_vector(0, DIMS));
    f.add(1, "a2.png", blend(&axis_vector(0, DIMS), &axis_vector(1, DIMS), 0.5));
    f.add(2, "b1.png", axis_vector(1, DIMS));

    let results = f.resolver.search(&png_bytes(16, 16, 2), 5).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].product_id, ProductId(1));
    assert_eq!(results[0].image_reference, "a1.png");
    assert_eq!(results[0].similarity_score, 1.0);
    assert_eq!(results[1].product_id, ProductId(2));
    assert!(results[0].similarity_score > results[1].similarity_score);
}

#[test]
fn k_zero_never_calls_the_provider() {
    let f = fixture(axis_vector(0, DIMS));
    f.add(1, "a.png", axis_vector(0, DIMS));
    assert!(f.resolver.search(&png_bytes(8, 8, 3), 0).unwrap().is_empty());
    assert_eq!(f.provider.calls(), 0);
}

#[test]
fn results_never_exceed_k() {
    let f = fixture(axis_vector(0, DIMS));
    for p in 0..6 {
        f.add(p, &format!("{p}.png"), axis_vector(p as usize, DIMS));
    }
    let results = f.resolver.search_vector(&axis_vector(0, DIMS), 3).unwrap();
    assert_eq!(results.len(), 3);
}

#[test]
fn deleted_products_are_skipped_until_reload() {
    let f = fixture(axis_vector(0, DIMS));
    f.add(1, "gone.png", axis_vector(0, DIMS));
    f.add(2, "kept.png", axis_vector(1, DIMS));

    assert!(f.storage.delete_product(ProductId(1)).unwrap());
    // The index still holds the deleted vector's ordinal.
    assert_eq!(f.index.cardinality().unwrap(), 2);

    let results = f.resolver.search_vector(&axis_vector(0, DIMS), 5).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].product_id, ProductId(2));

    f.index.refresh().unwrap();
    assert_eq!(f.index.cardinality().unwrap(), 1);
}

#[test]
fn hits_carry_record_metadata() {
    let f = fixture(axis_vector(0, DIMS));
    let outcome = f
        .storage
        .upsert_with_product(
            &Product::new(3, "lamp"),
            &NewVectorRecord::new(ProductId(3), "lamp.png", axis_vector(2, DIMS))
                .with_original_path(Some("uploads/good_images/3/lamp.png".into())),
        )
        .unwrap();
    f.index.load().unwrap();

    let results = f.resolver.search_vector(&axis_vector(2, DIMS), 1).unwrap();
    assert_eq!(results[0].persistent_id, outcome.persistent_id);
    assert_eq!(
        results[0].original_path.as_deref(),
        Some("uploads/good_images/3/lamp.png")
    );
    assert!(results[0].raw_distance.abs() < 1e-6);
}
