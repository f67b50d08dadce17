//! Text embedding for similarity search
//!
//! `HashingEmbedder` is deterministic and offline; `NomicEmbedder` (feature
//! `semantic`) runs nomic-embed-text locally through candle.

pub mod hashing;
#[cfg(feature = "semantic")]
pub mod engine;

use crate::errors::Result;

pub use hashing::HashingEmbedder;
#[cfg(feature = "semantic")]
pub use engine::NomicEmbedder;

/// Maps text to a fixed-length vector
pub trait Embedder: Send + Sync {
    /// Embed arbitrary text
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed text that will be stored in the collection
    fn embed_document(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(text)
    }

    /// Embed text used to search the collection
    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(text)
    }

    /// Vector length produced by this embedder
    fn dimension(&self) -> usize;
}

/// Cosine distance `1 - cos(a, b)`. Zero vectors are maximally distant from
/// everything (distance 1.0).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    (1.0 - similarity).clamp(0.0, 2.0)
}

/// Scale `v` to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_have_zero_distance() {
        let v = vec![0.3, 0.4, 0.0];
        assert!(cosine_distance(&v, &v) < 1e-9);
    }

    #[test]
    fn test_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_vector_is_far_from_everything() {
        let zero = vec![0.0, 0.0];
        assert_eq!(cosine_distance(&zero, &[1.0, 0.0]), 1.0);
        assert_eq!(cosine_distance(&zero, &zero), 1.0);
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }
}
