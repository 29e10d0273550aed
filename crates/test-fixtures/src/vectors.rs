//! Deterministic unit vectors.

/// A pseudo-random unit vector derived from `seed` (splitmix64).
pub fn unit_vector(seed: u64, dims: usize) -> Vec<f32> {
    let mut state = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut v: Vec<f32> = (0..dims)
        .map(|_| {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^= z >> 31;
            // Map to [-1, 1).
            ((z >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0) as f32
        })
        .collect();
    normalize(&mut v);
    v
}

/// The `axis`-th standard basis vector.
pub fn axis_vector(axis: usize, dims: usize) -> Vec<f32> {
    let mut v = vec![0.0; dims];
    v[axis] = 1.0;
    v
}

/// Normalized `a * (1 - t) + b * t`.
pub fn blend(a: &[f32], b: &[f32], t: f32) -> Vec<f32> {
    let mut v: Vec<f32> = a
        .iter()
        .zip(b)
        .map(|(x, y)| x * (1.0 - t) + y * t)
        .collect();
    normalize(&mut v);
    v
}

fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}
