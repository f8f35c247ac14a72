//! Embedder backed by a local Ollama instance.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::embed::Embedder;
use crate::core::error::{ChunkwiseError, Result};

/// Calls `POST {url}/api/embed`
pub struct OllamaEmbedder {
    client: Client,
    url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    pub fn new(url: String, model: String, dimensions: usize) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            model,
            dimensions,
        }
    }

    /// Endpoint the embedder posts to
    pub fn endpoint(&self) -> String {
        format!("{}/api/embed", self.url)
    }
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = OllamaEmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChunkwiseError::EmbeddingFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let parsed: OllamaEmbedResponse = response.json().await?;
        check_embeddings(parsed.embeddings, texts.len(), self.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Reject a response with the wrong number of vectors or a vector
/// whose length differs from the configured dimensions
fn check_embeddings(
    embeddings: Vec<Vec<f32>>,
    expected: usize,
    dimensions: usize,
) -> Result<Vec<Vec<f32>>> {
    if embeddings.len() != expected {
        return Err(ChunkwiseError::EmbeddingFailed(format!(
            "Ollama returned {} embeddings for {} inputs",
            embeddings.len(),
            expected
        )));
    }
    if let Some(bad) = embeddings.iter().find(|v| v.len() != dimensions) {
        return Err(ChunkwiseError::EmbeddingFailed(format!(
            "Ollama returned a {}-dimensional vector, embedding.dimensions is {}",
            bad.len(),
            dimensions
        )));
    }
    Ok(embeddings)
}
