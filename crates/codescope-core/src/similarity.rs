//! Cosine similarity scorer shared by every ranking implementation.
//!
//! Both the SQLite operator and the in-memory rankers call [`score`], so the
//! two paths produce bit-identical values for identical inputs. Components
//! are widened to `f64` and accumulated left to right in a single pass.
//!
//! A pair is *degenerate* when either norm is below [`ZERO_NORM_TOLERANCE`]
//! or the lengths differ. Degenerate pairs score [`DEGENERATE_SCORE`]
//! (negative infinity) so a plain descending sort puts them last.

pub use crate::constants::{DEGENERATE_SCORE, ZERO_NORM_TOLERANCE};

/// Cosine similarity of `a` and `b`, clamped to `[-1.0, 1.0]`, or
/// [`DEGENERATE_SCORE`] if the pair cannot be ranked.
pub fn score(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return DEGENERATE_SCORE;
    }
    let (mut dot, mut sq_a, mut sq_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        sq_a += x * x;
        sq_b += y * y;
    }
    let (norm_a, norm_b) = (sq_a.sqrt(), sq_b.sqrt());
    if norm_a < ZERO_NORM_TOLERANCE || norm_b < ZERO_NORM_TOLERANCE {
        return DEGENERATE_SCORE;
    }
    let cosine = dot / (norm_a * norm_b);
    if cosine.is_nan() {
        // NaN/inf components.
        return DEGENERATE_SCORE;
    }
    cosine.clamp(-1.0, 1.0)
}

/// Like [`score`], but `None` for degenerate pairs.
pub fn score_opt(a: &[f32], b: &[f32]) -> Option<f64> {
    let s = score(a, b);
    (!is_degenerate(s)).then_some(s)
}

/// Sum and peak of the valid (non-degenerate) per-query similarities of one
/// candidate, or `None` if every value is degenerate.
///
/// Values are folded in iteration order so every caller summing the same
/// sequence gets the same bits.
pub fn fuse<I>(similarities: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    similarities
        .into_iter()
        .filter(|s| !is_degenerate(*s))
        .fold(None, |acc, s| match acc {
            None => Some((s, s)),
            Some((sum, max)) => Some((sum + s, max.max(s))),
        })
}

/// True if `score` is the degenerate sentinel.
pub fn is_degenerate(score: f64) -> bool {
    score == DEGENERATE_SCORE
}

/// Euclidean norm, computed in `f64`.
pub fn norm(v: &[f32]) -> f64 {
    v.iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt()
}

/// True if `v` is empty or its norm is below [`ZERO_NORM_TOLERANCE`].
pub fn is_degenerate_vector(v: &[f32]) -> bool {
    v.is_empty() || norm(v) < ZERO_NORM_TOLERANCE
}
