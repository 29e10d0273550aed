//! Single-image ingestion.

mod common;

use lookalike_core::ids::{Ordinal, ProductId};
use lookalike_core::models::{Product, ResolvedImage};
use lookalike_core::retry::RetryPolicy;
use lookalike_core::traits::{ICatalog, IVectorStorage};
use test_fixtures::{axis_vector, png_bytes, ScriptedProvider, ScriptedResponse};

use common::{Harness, DIMS};

fn image(seed: u8) -> ResolvedImage {
    ResolvedImage {
        bytes: png_bytes(12, 12, seed),
        original_path: Some(format!("uploads/good_images/1/{seed}.png")),
    }
}

#[test]
fn add_persists_and_appends() {
    let h = Harness::new(ScriptedProvider::new(axis_vector(0, DIMS)), RetryPolicy::none());
    let product = Product::new(1, "stool");

    let outcome = h.pipeline().add(&product, "a.png", &image(1)).unwrap();
    assert!(!outcome.replaced);
    assert_eq!(outcome.ordinal, Some(Ordinal(0)));
    assert_eq!(h.index.cardinality().unwrap(), 1);

    let record = h.storage.get_record(outcome.persistent_id).unwrap().unwrap();
    assert_eq!(record.product_id, ProductId(1));
    assert_eq!(record.original_path.as_deref(), Some("uploads/good_images/1/1.png"));
    assert_eq!(
        h.storage.image_references(ProductId(1)).unwrap(),
        vec!["a.png".to_string()]
    );
}

#[test]
fn extraction_failure_leaves_no_trace() {
    let h = Harness::new(
        ScriptedProvider::new(axis_vector(0, DIMS))
            .with_script([ScriptedResponse::Failure("InvalidParameter".into())]),
        RetryPolicy::none(),
    );
    let before = h.index.cardinality().unwrap();

    assert!(h.pipeline().add(&Product::new(1, "stool"), "a.png", &image(1)).is_err());
    assert_eq!(h.storage.count_records().unwrap(), 0);
    assert_eq!(h.index.cardinality().unwrap(), before);
    assert!(h.storage.get_product(ProductId(1)).unwrap().is_none());
}

#[test]
fn rate_limited_twice_then_ingested() {
    let h = Harness::new(
        ScriptedProvider::new(axis_vector(2, DIMS)).with_script([
            ScriptedResponse::RateLimited,
            ScriptedResponse::RateLimited,
        ]),
        RetryPolicy::default(),
    );
    let outcome = h.pipeline().add(&Product::new(1, "stool"), "a.png", &image(1)).unwrap();
    assert_eq!(h.provider.calls(), 3);
    assert_eq!(outcome.ordinal, Some(Ordinal(0)));
    assert_eq!(h.storage.count_records().unwrap(), 1);
}

#[test]
fn reingesting_a_reference_upserts_without_appending() {
    let h = Harness::new(
        ScriptedProvider::new(axis_vector(0, DIMS))
            .with_script([ScriptedResponse::Vector(axis_vector(1, DIMS))]),
        RetryPolicy::none(),
    );
    let product = Product::new(1, "stool");
    let first = h.pipeline().add(&product, "a.png", &image(1)).unwrap();
    let second = h.pipeline().add(&product, "a.png", &image(2)).unwrap();

    assert!(second.replaced);
    assert_eq!(second.ordinal, None);
    assert_eq!(second.persistent_id, first.persistent_id);
    assert_eq!(h.index.cardinality().unwrap(), 1);
    assert_eq!(h.storage.count_records().unwrap(), 1);

    // The live index still holds the old vector until a refresh.
    let hits = h.index.search(&axis_vector(0, DIMS), 1).unwrap();
    assert!(hits[0].distance > 1.0);
    h.index.refresh().unwrap();
    let hits = h.index.search(&axis_vector(0, DIMS), 1).unwrap();
    assert!(hits[0].distance < 1e-6);
}
