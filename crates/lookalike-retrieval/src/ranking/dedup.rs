use std::cmp::Ordering;
use std::collections::HashMap;

use lookalike_core::ids::ProductId;
use lookalike_core::models::SearchHit;

/// Keep the highest-scoring hit per product. On equal scores the hit seen
/// first wins, so input order (ascending distance, then ordinal) decides.
pub fn best_per_product(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut best: HashMap<ProductId, SearchHit> = HashMap::with_capacity(hits.len());
    for hit in hits {
        match best.get(&hit.product_id) {
            Some(current) if current.similarity_score >= hit.similarity_score => {}
            _ => {
                best.insert(hit.product_id, hit);
            }
        }
    }
    best.into_values().collect()
}

/// Sort descending by similarity, ties by product id ascending.
pub fn rank(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(Ordering::Equal)
            .then(a.product_id.cmp(&b.product_id))
    });
}
