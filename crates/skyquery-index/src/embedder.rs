//! Text embedding backends.
//!
//! The default [`HashEmbedder`] needs no model files: it folds token hashes
//! into a fixed-dimension signed vector. Not semantically rich, but fast,
//! deterministic, and dependency-free. Neural embedders plug in behind the
//! same trait.

use crate::{IndexResult, util};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Converts text into fixed-dimension vectors.
pub trait Embedder: Send + Sync {
    /// Embed a text into a vector.
    fn embed(&self, text: &str) -> IndexResult<Vec<f32>>;

    /// Vector dimension.
    fn dimension(&self) -> usize;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

/// Hash-based embedder.
///
/// Each token is hashed with several seeds; every hash picks an index and a
/// sign, and the hits are accumulated and L2-normalized. Texts sharing
/// vocabulary land near each other; unrelated texts are near-orthogonal.
pub struct HashEmbedder {
    dimension: usize,
    num_hashes: usize,
}

impl HashEmbedder {
    /// Create a new hash embedder with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            num_hashes: 4,
        }
    }

    fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.len() > 1)
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn bucket(&self, token: &str, seed: u64) -> usize {
        let mut hasher = DefaultHasher::new();
        seed.hash(&mut hasher);
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimension
    }

    fn sign(&self, token: &str, seed: u64) -> f32 {
        let mut hasher = DefaultHasher::new();
        (seed + 1000).hash(&mut hasher);
        token.hash(&mut hasher);
        if hasher.finish() % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> IndexResult<Vec<f32>> {
        let tokens: Vec<String> = Self::tokenize(text).collect();

        // Empty or token-free text embeds to the zero vector, which scores
        // 0.0 against everything. Queries stay total over all inputs.
        if tokens.is_empty() {
            return Ok(vec![0.0; self.dimension]);
        }

        let mut vector = vec![0.0f32; self.dimension];
        for token in &tokens {
            for seed in 0..self.num_hashes as u64 {
                let idx = self.bucket(token, seed);
                vector[idx] += self.sign(token, seed);
            }
        }

        util::normalize(&mut vector);
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_embedder_deterministic() {
        let embedder = HashEmbedder::new(128);

        let v1 = embedder.embed("rainfall estimates").unwrap();
        let v2 = embedder.embed("rainfall estimates").unwrap();

        assert_eq!(v1.len(), 128);
        assert!((util::cosine_similarity(&v1, &v2) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_related_texts_score_higher() {
        let embedder = HashEmbedder::new(256);

        let v1 = embedder.embed("INSAT-3D rainfall estimates").unwrap();
        let v2 = embedder.embed("rainfall estimates from the INSAT-3D imager").unwrap();
        let v3 = embedder.embed("terms of use and privacy policy").unwrap();

        let related = util::cosine_similarity(&v1, &v2);
        let unrelated = util::cosine_similarity(&v1, &v3);
        assert!(related > unrelated);
    }

    #[test]
    fn test_empty_text_embeds_to_zero() {
        let embedder = HashEmbedder::new(64);
        let v = embedder.embed("   ").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
