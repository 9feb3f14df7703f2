//! Cosine similarity engine
//!
//! Degenerate comparisons are reported through [`Score`] rather than as
//! errors, so the aggregator can scan a whole batch before failing. Only a
//! length mismatch aborts immediately.

use crate::kernel;
use crate::{Error, Result};

/// Outcome of comparing two vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// A regular cosine similarity in [-1, 1]
    Similarity(f32),
    /// One of the vectors has zero magnitude
    VectorLengthZero,
    /// The division produced NaN (e.g. infinite components)
    NotANumber,
}

impl Score {
    #[inline]
    #[must_use]
    pub fn value(self) -> Option<f32> {
        match self {
            Score::Similarity(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !matches!(self, Score::Similarity(_))
    }
}

/// Compute the cosine similarity of `a` and `b`.
///
/// # Errors
/// Returns [`Error::VectorLengthMismatch`] when the slices differ in length.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<Score> {
    if a.len() != b.len() {
        return Err(Error::VectorLengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let acc = kernel::accumulate(a, b);

    if acc.norm_sq_a == 0.0 || acc.norm_sq_b == 0.0 {
        return Ok(Score::VectorLengthZero);
    }

    let similarity = acc.dot / (acc.norm_sq_a.sqrt() * acc.norm_sq_b.sqrt());
    if similarity.is_nan() {
        Ok(Score::NotANumber)
    } else {
        Ok(Score::Similarity(similarity as f32))
    }
}
