use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use lookalike_core::config::EmbeddingConfig;
use lookalike_core::ids::ProductId;
use lookalike_core::models::{NewVectorRecord, Product};
use lookalike_core::retry::RetryPolicy;
use lookalike_core::traits::IVectorStorage;
use lookalike_embeddings::ImageEmbedder;
use lookalike_index::VectorStoreSync;
use lookalike_retrieval::{distance_to_similarity, SimilarityResolver};
use lookalike_storage::StorageEngine;
use test_fixtures::{unit_vector, ConstantProvider};

const DIMS: usize = 6;

proptest! {
    #[test]
    fn similarity_is_strictly_decreasing(a in 0.0f32..100.0, b in 0.0f32..100.0) {
        prop_assume!(a < b);
        prop_assert!(distance_to_similarity(a) > distance_to_similarity(b));
        prop_assert!(distance_to_similarity(b) > 0.0);
        prop_assert!(distance_to_similarity(a) <= 1.0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Results hold each product once, sorted by score, each product's
    /// entry being its best-scoring image.
    #[test]
    fn one_entry_per_product_best_first(
        owners in prop::collection::vec(0i64..5, 1..25),
        query_seed in 0u64..1000,
        k in 1usize..30,
    ) {
        let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
        for (i, owner) in owners.iter().enumerate() {
            storage
                .upsert_with_product(
                    &Product::new(*owner, "p"),
                    &NewVectorRecord::new(ProductId(*owner), format!("{i}.png"), unit_vector(i as u64, DIMS)),
                )
                .unwrap();
        }
        let index = Arc::new(VectorStoreSync::new(storage.clone(), DIMS));
        index.load().unwrap();
        let config = EmbeddingConfig { dimensions: DIMS, cache_capacity: 0, ..Default::default() };
        let embedder = Arc::new(ImageEmbedder::new(
            Arc::new(ConstantProvider::new(unit_vector(0, DIMS))),
            &config,
            RetryPolicy::none(),
        ));
        let resolver = SimilarityResolver::new(embedder, index.clone(), storage, 100);

        let query = unit_vector(query_seed + 10_000, DIMS);
        let results = resolver.search_vector(&query, k).unwrap();

        let distinct: HashSet<ProductId> = owners.iter().map(|o| ProductId(*o)).collect();
        prop_assert!(results.len() <= k.min(distinct.len()));

        let mut seen = HashSet::new();
        for r in &results {
            prop_assert!(seen.insert(r.product_id));
        }
        prop_assert!(results.windows(2).all(|w| w[0].similarity_score >= w[1].similarity_score));

        // Each survivor beats every other neighbor of its product that
        // made it into the top k.
        let neighbors = index.search(&query, k).unwrap();
        for r in &results {
            let owner_best = neighbors
                .iter()
                .filter(|n| {
                    let i: usize = storage_index(n.persistent_id.0);
                    ProductId(owners[i]) == r.product_id
                })
                .map(|n| distance_to_similarity(n.distance))
                .fold(0.0f32, f32::max);
            prop_assert!((r.similarity_score - owner_best).abs() < 1e-6);
        }
    }
}

/// Persistent ids start at 1 and follow insertion order on a fresh database.
fn storage_index(persistent_id: i64) -> usize {
    (persistent_id - 1) as usize
}
