//! ImageEmbedder behavior against scripted providers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use lookalike_core::config::EmbeddingConfig;
use lookalike_core::errors::{EmbeddingError, LookalikeError};
use lookalike_core::retry::RetryPolicy;
use lookalike_embeddings::normalize::l2_norm;
use lookalike_embeddings::ImageEmbedder;
use test_fixtures::{png_bytes, ScriptedProvider, ScriptedResponse};

const DIMS: usize = 16;

fn config(cache_capacity: u64) -> EmbeddingConfig {
    EmbeddingConfig {
        dimensions: DIMS,
        cache_capacity,
        ..Default::default()
    }
}

fn raw_vector() -> Vec<f32> {
    (1..=DIMS).map(|i| i as f32).collect()
}

/// Embedder with real backoff delays recorded instead of slept.
fn embedder(
    provider: Arc<ScriptedProvider>,
    cache_capacity: u64,
) -> (ImageEmbedder, Arc<Mutex<Vec<Duration>>>) {
    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&sleeps);
    let embedder = ImageEmbedder::new(provider, &config(cache_capacity), RetryPolicy::default())
        .with_jitter(Duration::ZERO, Duration::ZERO)
        .with_sleeper(move |d| recorded.lock().unwrap().push(d));
    (embedder, sleeps)
}

#[test]
fn extracted_vectors_are_unit_norm() {
    let provider = Arc::new(ScriptedProvider::new(raw_vector()));
    let (embedder, _) = embedder(provider, 0);
    let v = embedder.extract(&png_bytes(20, 20, 1)).unwrap();
    assert_eq!(v.len(), DIMS);
    assert!((l2_norm(&v) - 1.0).abs() < 1e-5);
}

#[test]
fn rate_limited_twice_then_success() {
    let provider = Arc::new(ScriptedProvider::new(raw_vector()).with_script([
        ScriptedResponse::RateLimited,
        ScriptedResponse::RateLimited,
    ]));
    let (embedder, sleeps) = embedder(Arc::clone(&provider), 0);

    let v = embedder.extract(&png_bytes(20, 20, 2)).unwrap();
    assert!((l2_norm(&v) - 1.0).abs() < 1e-5);
    assert_eq!(provider.calls(), 3);

    let backoffs: Vec<Duration> = sleeps
        .lock()
        .unwrap()
        .iter()
        .copied()
        .filter(|d| !d.is_zero())
        .collect();
    assert_eq!(
        backoffs,
        vec![Duration::from_secs(5), Duration::from_secs(10)]
    );
}

#[test]
fn every_attempt_is_preceded_by_jitter() {
    let provider = Arc::new(ScriptedProvider::new(raw_vector()).with_script([
        ScriptedResponse::RateLimited,
        ScriptedResponse::RateLimited,
    ]));
    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&sleeps);
    let embedder = ImageEmbedder::new(provider.clone(), &config(0), RetryPolicy::default())
        .with_sleeper(move |d| recorded.lock().unwrap().push(d));

    embedder.extract(&png_bytes(20, 20, 3)).unwrap();
    assert_eq!(provider.calls(), 3);

    // jitter, backoff, jitter, backoff, jitter
    let sleeps = sleeps.lock().unwrap().clone();
    assert_eq!(sleeps.len(), 5);
    for jitter in sleeps.iter().step_by(2) {
        assert!(
            (Duration::from_millis(100)..=Duration::from_millis(600)).contains(jitter),
            "jitter out of range: {jitter:?}"
        );
    }
    assert_eq!(sleeps[1], Duration::from_secs(5));
    assert_eq!(sleeps[3], Duration::from_secs(10));
}

#[test]
fn persistent_rate_limit_exhausts_retries() {
    let provider = Arc::new(ScriptedProvider::new(raw_vector()).with_script(
        std::iter::repeat(ScriptedResponse::RateLimited).take(3),
    ));
    let (embedder, _) = embedder(Arc::clone(&provider), 0);

    let err = embedder.extract(&png_bytes(20, 20, 3)).unwrap_err();
    assert!(matches!(
        err,
        LookalikeError::EmbeddingError(EmbeddingError::RetriesExhausted { attempts: 3, .. })
    ));
    assert_eq!(provider.calls(), 3);
}

#[test]
fn non_rate_limit_failure_is_not_retried() {
    let provider = Arc::new(
        ScriptedProvider::new(raw_vector())
            .with_script([ScriptedResponse::Failure("InvalidParameter".into())]),
    );
    let (embedder, _) = embedder(Arc::clone(&provider), 0);

    let err = embedder.extract(&png_bytes(20, 20, 4)).unwrap_err();
    assert!(matches!(
        err,
        LookalikeError::EmbeddingError(EmbeddingError::ProviderFailed { .. })
    ));
    assert_eq!(provider.calls(), 1);
}

#[test]
fn zero_vector_is_degenerate() {
    let provider = Arc::new(ScriptedProvider::new(vec![0.0; DIMS]));
    let (embedder, _) = embedder(provider, 0);
    let err = embedder.extract(&png_bytes(20, 20, 5)).unwrap_err();
    assert!(matches!(
        err,
        LookalikeError::EmbeddingError(EmbeddingError::DegenerateVector)
    ));
}

#[test]
fn wrong_dimension_is_rejected() {
    let provider = Arc::new(ScriptedProvider::new(vec![1.0; DIMS - 1]));
    let (embedder, _) = embedder(provider, 0);
    let err = embedder.extract(&png_bytes(20, 20, 6)).unwrap_err();
    assert!(matches!(
        err,
        LookalikeError::EmbeddingError(EmbeddingError::DimensionMismatch {
            expected: DIMS,
            actual: 15
        })
    ));
}

#[test]
fn undecodable_bytes_never_reach_the_provider() {
    let provider = Arc::new(ScriptedProvider::new(raw_vector()));
    let (embedder, _) = embedder(Arc::clone(&provider), 0);
    assert!(embedder.extract(b"GIF89a-but-not-really").is_err());
    assert_eq!(provider.calls(), 0);
}

#[test]
fn cache_hit_skips_provider() {
    let provider = Arc::new(ScriptedProvider::new(raw_vector()));
    let (embedder, _) = embedder(Arc::clone(&provider), 8);
    let bytes = png_bytes(20, 20, 7);

    let first = embedder.extract(&bytes).unwrap();
    let second = embedder.extract(&bytes).unwrap();
    assert_eq!(first, second);
    assert_eq!(provider.calls(), 1);

    embedder.extract(&png_bytes(20, 20, 8)).unwrap();
    assert_eq!(provider.calls(), 2);
}

#[test]
fn provider_receives_jpeg_data_uri() {
    let provider = Arc::new(ScriptedProvider::new(raw_vector()));
    let (embedder, _) = embedder(Arc::clone(&provider), 0);
    embedder.extract(&png_bytes(40, 30, 9)).unwrap();
    let payloads = provider.payloads();
    assert_eq!(payloads.len(), 1);
    assert!(payloads[0].data_uri.starts_with("data:image/jpeg;base64,"));
    assert_eq!((payloads[0].width, payloads[0].height), (40, 30));
}
