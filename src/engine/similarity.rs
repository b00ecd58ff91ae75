//! Vector Similarity Functions
//!
//! Cosine similarity restricted to the positions observed in both vectors.

use crate::error::{Error, Result};
use crate::population::is_missing;

/// Accumulated sums over jointly observed positions
///
/// Each side is divided by its largest jointly observed magnitude before
/// accumulating, so the sums stay in `[0, count]` for any finite input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overlap {
    /// Number of positions observed in both vectors
    pub count: usize,
    /// Largest absolute observed value of `a` over the shared positions
    pub scale_a: f64,
    pub scale_b: f64,
    /// Dot product of the scaled values
    pub dot: f64,
    pub norm_a: f64,
    pub norm_b: f64,
}

impl Overlap {
    /// Cosine of the accumulated sums, 0.0 when either side has no magnitude
    #[inline]
    pub fn cosine(&self) -> f64 {
        if !(self.norm_a > 0.0 && self.norm_b > 0.0) {
            return 0.0;
        }
        let cosine = self.dot / (self.norm_a * self.norm_b).sqrt();
        if cosine.is_finite() {
            cosine.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

#[inline]
fn joint<'a>(a: &'a [f64], b: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x, y))
        .filter(|&(x, y)| !is_missing(x) && !is_missing(y))
}

/// Compute scaled dot product and norms over pairwise-complete positions
#[inline]
pub fn observed_overlap(a: &[f64], b: &[f64]) -> Overlap {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut acc = Overlap::default();
    for (x, y) in joint(a, b) {
        acc.count += 1;
        acc.scale_a = acc.scale_a.max(x.abs());
        acc.scale_b = acc.scale_b.max(y.abs());
    }
    if acc.scale_a == 0.0 || acc.scale_b == 0.0 {
        return acc;
    }

    for (x, y) in joint(a, b) {
        let x = x / acc.scale_a;
        let y = y / acc.scale_b;
        acc.dot += x * y;
        acc.norm_a += x * x;
        acc.norm_b += y * y;
    }
    acc
}

/// Compute missing-aware cosine similarity between two vectors
///
/// Only positions where neither vector is `MISSING` contribute. Returns a
/// value in [-1, 1], or 0.0 when either vector has no non-zero observed
/// value in the shared positions.
pub fn similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(similarity_unchecked(a, b))
}

/// Same as [`similarity`] for callers that already guarantee equal lengths
#[inline]
pub fn similarity_unchecked(a: &[f64], b: &[f64]) -> f64 {
    observed_overlap(a, b).cosine()
}
