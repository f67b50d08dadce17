//! Feature-hashed bag-of-words embeddings
//!
//! Each lowercase alphanumeric token is hashed into one of `dimension`
//! buckets and the bucket counts are L2-normalised. Identical text always maps
//! to the identical vector, so a saved document searched with its own text
//! comes back at distance 0.

use crate::errors::{AgentError, Result};
use crate::memory::embedding::{l2_normalize, Embedder};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Default number of hash buckets
pub const DEFAULT_DIMENSION: usize = 256;

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(AgentError::EmbeddingError(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        (hasher.finish() % self.dimension as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
        }
    }
}

/// Lowercase alphanumeric tokens of `text`
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokenize(text) {
            vector[self.bucket(&token)] += 1.0;
        }
        l2_normalize(&mut vector);
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::embedding::cosine_distance;

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(HashingEmbedder::new(0).is_err());
    }

    #[test]
    fn test_deterministic() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed("Gradient descent minimizes a function").unwrap();
        let b = embedder.embed("Gradient descent minimizes a function").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_DIMENSION);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed("Adam optimizer!").unwrap();
        let b = embedder.embed("adam, OPTIMIZER").unwrap();
        assert!(cosine_distance(&a, &b) < 1e-6);
    }

    #[test]
    fn test_unrelated_text_is_distant() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed("transformers rely on self-attention").unwrap();
        let b = embedder.embed("bananas grow in warm climates").unwrap();
        assert!(cosine_distance(&a, &b) > 0.5);
    }

    #[test]
    fn test_empty_text_embeds_to_zero_vector() {
        let embedder = HashingEmbedder::new(8).unwrap();
        let v = embedder.embed("   ").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_tokenize() {
        let tokens: Vec<String> = tokenize("What are RNNs? (Recurrent)").collect();
        assert_eq!(tokens, vec!["what", "are", "rnns", "recurrent"]);
    }
}
