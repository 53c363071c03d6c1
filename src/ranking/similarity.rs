//! Cosine similarity between embedding vectors

use rayon::prelude::*;
use thiserror::Error;

use crate::error::Error as CrateError;

/// Vectors at least this long are scored across the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 1_024;

/// Error type for similarity computations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorError {
    /// One of the inputs has no components
    #[error("vectors must be non-empty (undefined similarity)")]
    Empty,

    /// The inputs have different dimensions
    #[error("vector lengths differ: {left} vs {right} (undefined similarity)")]
    LengthMismatch {
        /// Length of the first vector
        left: usize,
        /// Length of the second vector
        right: usize,
    },

    /// One of the inputs is the zero vector
    #[error("one of the vectors is zero (undefined similarity)")]
    ZeroNorm,
}

impl From<VectorError> for CrateError {
    fn from(err: VectorError) -> Self {
        CrateError::Vector(err.to_string())
    }
}

/// Running sums for one contiguous index range
#[derive(Debug, Default, Clone, Copy)]
struct Partial {
    dot: f64,
    norm_a2: f64,
    norm_b2: f64,
}

impl Partial {
    fn accumulate(a: &[f64], b: &[f64]) -> Self {
        a.iter().zip(b).fold(Self::default(), |acc, (x, y)| Self {
            dot: acc.dot + x * y,
            norm_a2: acc.norm_a2 + x * x,
            norm_b2: acc.norm_b2 + y * y,
        })
    }

    fn combine(self, other: Self) -> Self {
        Self {
            dot: self.dot + other.dot,
            norm_a2: self.norm_a2 + other.norm_a2,
            norm_b2: self.norm_b2 + other.norm_b2,
        }
    }

    fn finish(self) -> Result<f64, VectorError> {
        let denominator = self.norm_a2.sqrt() * self.norm_b2.sqrt();
        if denominator == 0.0 {
            return Err(VectorError::ZeroNorm);
        }
        Ok((self.dot / denominator).clamp(-1.0, 1.0))
    }
}

/// Cosine similarity of `a` and `b`
///
/// - `a` and `b` must be non-empty and of identical length.
/// - If either vector is all-zero an error is returned.
/// - Vectors of [`PARALLEL_THRESHOLD`] or more components are split into one
///   contiguous range per rayon worker and the partial sums are combined
///   before the final ratio.
pub fn cosine(a: &[f64], b: &[f64]) -> Result<f64, VectorError> {
    if a.is_empty() || b.is_empty() {
        return Err(VectorError::Empty);
    }
    if a.len() != b.len() {
        return Err(VectorError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let n = a.len();
    if n < PARALLEL_THRESHOLD {
        return Partial::accumulate(a, b).finish();
    }

    let workers = rayon::current_num_threads().max(1);
    let chunk = n.div_ceil(workers);
    a.par_chunks(chunk)
        .zip(b.par_chunks(chunk))
        .map(|(a, b)| Partial::accumulate(a, b))
        .reduce(Partial::default, Partial::combine)
        .finish()
}
