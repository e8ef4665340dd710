//! Embedding collaborator interface and similarity math
//!
//! The engine never owns an embedding model; it consumes one through the
//! [`Embedder`] trait, constructed by the host process and injected by
//! reference. [`HashEmbedder`] is the deterministic feature-hashing
//! implementation used as a fallback and in tests.

use crate::error::{EngineError, Result};
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};
use unicode_segmentation::UnicodeSegmentation;

/// Maps text to a fixed-length embedding vector.
///
/// Implementations must be deterministic for identical input and must fail
/// (rather than return an empty vector) on empty or whitespace-only text.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Length of the vectors this embedder produces.
    fn dimension(&self) -> usize;

    /// Implementation name recorded in diagnostics.
    fn name(&self) -> &str;
}

/// Cosine similarity between two equal-length vectors, in [-1, 1].
///
/// Empty or length-mismatched inputs are an `InvalidEmbedding` error; a
/// zero-norm vector yields 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.is_empty() || b.is_empty() {
        return Err(EngineError::InvalidEmbedding(
            "cannot compare empty embedding vectors".to_string(),
        ));
    }

    if a.len() != b.len() {
        return Err(EngineError::InvalidEmbedding(format!(
            "embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

/// Memoizing wrapper around an embedder.
///
/// Concept phrases and skill strings recur across every pair in a batch;
/// caching keeps the collaborator to one call per distinct text.
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    cache: Mutex<HashMap<String, Vec<f32>>>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

impl Embedder for CachedEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(cached) = cache.get(text) {
                return Ok(cached.clone());
            }
        }

        let embedding = self.inner.embed(text)?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(text.to_string(), embedding.clone());
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

// Fixed seeds keep the hash embedding stable across builds; changing them
// invalidates every stored vector.
const HASH_SEED_K0: u64 = 0x7461_6c65_6e74_6d61;
const HASH_SEED_K1: u64 = 0x7463_6820_656e_6731;

/// Deterministic feature-hashing embedder.
///
/// Each lowercased token is hashed to a dimension index with SipHash-1-3
/// and accumulated with a sign hash, then the vector is L2-normalized.
/// Texts sharing tokens land close together, which is enough for the
/// semantic-threshold checks in tests and degraded deployments; it is not
/// a substitute for a trained model.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash_token(&self, token: &str) -> usize {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimension
    }

    fn token_sign(&self, token: &str) -> f32 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K1, HASH_SEED_K0);
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
        // Same dimensionality as the bge-base family this stands in for.
        Self::new(768)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EngineError::InvalidEmbedding(
                "cannot embed empty or whitespace-only text".to_string(),
            ));
        }

        let mut vector = vec![0.0f32; self.dimension];
        let mut token_count = 0usize;

        for word in text.unicode_words() {
            let token = word.to_lowercase();
            let idx = self.hash_token(&token);
            vector[idx] += self.token_sign(&token);
            token_count += 1;
        }

        if token_count == 0 {
            return Err(EngineError::InvalidEmbedding(
                "text contains no embeddable tokens".to_string(),
            ));
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hash"
    }
}
