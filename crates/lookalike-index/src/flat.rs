//! Exact flat L2 index.
//!
//! Vectors are stored row-major in one contiguous buffer; the row number
//! is the ordinal. Search scans every row, in parallel chunks.

use rayon::prelude::*;

use lookalike_core::errors::{IndexError, LookalikeResult};
use lookalike_core::ids::Ordinal;

/// Rows per rayon work item.
const ROWS_PER_CHUNK: usize = 256;

#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimensions: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Create an empty index for vectors of `dimensions` components.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            data: Vec::new(),
        }
    }

    pub fn with_capacity(dimensions: usize, rows: usize) -> Self {
        Self {
            dimensions,
            data: Vec::with_capacity(dimensions * rows),
        }
    }

    /// Components per stored vector.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        if self.dimensions == 0 {
            0
        } else {
            self.data.len() / self.dimensions
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a vector at the next ordinal.
    pub fn add(&mut self, vector: &[f32]) -> LookalikeResult<Ordinal> {
        self.check_dimensions(vector)?;
        let ordinal = Ordinal(self.len());
        self.data.extend_from_slice(vector);
        Ok(ordinal)
    }

    pub fn vector(&self, ordinal: Ordinal) -> Option<&[f32]> {
        let start = ordinal.0.checked_mul(self.dimensions)?;
        self.data.get(start..start + self.dimensions)
    }

    /// The `k` nearest stored vectors to `query` as `(ordinal, distance)`,
    /// ascending by distance, ties broken by ordinal.
    pub fn search(&self, query: &[f32], k: usize) -> LookalikeResult<Vec<(Ordinal, f32)>> {
        self.check_dimensions(query)?;
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let dims = self.dimensions;
        let mut scored: Vec<(Ordinal, f32)> = self
            .data
            .par_chunks(dims * ROWS_PER_CHUNK)
            .enumerate()
            .flat_map_iter(|(chunk_idx, chunk)| {
                let base = chunk_idx * ROWS_PER_CHUNK;
                chunk
                    .chunks_exact(dims)
                    .enumerate()
                    .map(move |(row, stored)| (Ordinal(base + row), euclidean(query, stored)))
            })
            .collect();

        let by_distance = |a: &(Ordinal, f32), b: &(Ordinal, f32)| {
            a.1.total_cmp(&b.1).then(a.0.cmp(&b.0))
        };
        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, by_distance);
            scored.truncate(k);
        }
        scored.sort_unstable_by(by_distance);
        Ok(scored)
    }

    fn check_dimensions(&self, vector: &[f32]) -> LookalikeResult<()> {
        if vector.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            }
            .into());
        }
        Ok(())
    }
}

/// Euclidean (not squared) distance.
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}
