//! L2 normalization and dimension validation.

use lookalike_core::constants::DEGENERATE_NORM_EPSILON;
use lookalike_core::errors::{EmbeddingError, LookalikeResult};

/// Euclidean norm, accumulated in f64.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt() as f32
}

/// Scale `v` to unit length. Fails with `DegenerateVector` when the norm
/// is too small to divide by.
pub fn normalize(mut v: Vec<f32>) -> LookalikeResult<Vec<f32>> {
    let norm = l2_norm(&v);
    if !norm.is_finite() || norm <= DEGENERATE_NORM_EPSILON {
        return Err(EmbeddingError::DegenerateVector.into());
    }
    v.iter_mut().for_each(|x| *x /= norm);
    Ok(v)
}

pub fn validate_dimensions(v: &[f32], expected: usize) -> LookalikeResult<()> {
    if v.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: v.len(),
        }
        .into());
    }
    Ok(())
}
