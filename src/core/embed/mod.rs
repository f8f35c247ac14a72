//! Text embedding backends.
//!
//! The windowing engine never embeds anything itself; the ingest and
//! query services hand chunk text to an [`Embedder`] chosen from
//! configuration.

pub mod hashing;
pub mod ollama;

pub use hashing::HashingEmbedder;
pub use ollama::OllamaEmbedder;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::config::EmbeddingConfig;
use crate::core::error::{ChunkwiseError, Result};

/// Provider name for the Ollama backend
pub const PROVIDER_OLLAMA: &str = "ollama";

/// Provider name for the offline hashing backend
pub const PROVIDER_HASHING: &str = "hashing";

/// Embedding backend
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, in order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Expected dimensionality of the output vectors
    fn dimensions(&self) -> usize;

    /// Model identifier recorded alongside stored vectors
    fn model_id(&self) -> &str;
}

/// Build the embedder named by `config.provider`
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.provider.as_str() {
        PROVIDER_OLLAMA => Ok(Arc::new(OllamaEmbedder::new(
            config.url.clone(),
            config.model.clone(),
            config.dimensions,
        ))),
        PROVIDER_HASHING => Ok(Arc::new(HashingEmbedder::new(config.dimensions)?)),
        other => Err(ChunkwiseError::ConfigError(format!(
            "Unknown embedding provider '{other}' (expected '{PROVIDER_OLLAMA}' or '{PROVIDER_HASHING}')"
        ))),
    }
}

/// Embed `texts` in batches of `batch_size`, preserving order.
pub async fn embed_in_batches(
    embedder: &dyn Embedder,
    texts: &[&str],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    let batch_size = batch_size.max(1);
    let mut vectors = Vec::with_capacity(texts.len());

    for (idx, batch) in texts.chunks(batch_size).enumerate() {
        let embedded = embedder.embed_batch(batch).await?;
        if embedded.len() != batch.len() {
            return Err(ChunkwiseError::EmbeddingFailed(format!(
                "Expected {} vectors, got {}",
                batch.len(),
                embedded.len()
            )));
        }
        vectors.extend(embedded);
        tracing::debug!(
            "Embedded batch {} ({}/{} texts)",
            idx + 1,
            vectors.len(),
            texts.len()
        );
    }

    Ok(vectors)
}
