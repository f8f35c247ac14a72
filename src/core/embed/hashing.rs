//! Deterministic offline embedder.
//!
//! Hashes lowercase whitespace tokens into a fixed number of buckets
//! and L2-normalizes the result. Texts sharing words get a positive
//! cosine similarity, which is enough for smoke tests and offline
//! runs without a model server.

use async_trait::async_trait;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use crate::core::embed::Embedder;
use crate::core::error::{ChunkwiseError, Result};

pub const HASHING_MODEL_ID: &str = "hashing-xxh64";

/// Bag-of-words feature hashing embedder
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(ChunkwiseError::ConfigError(
                "Embedding dimensions must be non-zero".to_string(),
            ));
        }
        Ok(Self { dimensions })
    }

    /// Embed one text
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dimensions];

        for token in text.split_whitespace() {
            let token = token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if token.is_empty() {
                continue;
            }

            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();

            let idx = (h % self.dimensions as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            v[idx] += sign;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        HASHING_MODEL_ID
    }
}
