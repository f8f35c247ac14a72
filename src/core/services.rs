//! Service container for chunkwise
//!
//! Wires configuration, the embedder and the vector collection into
//! the two end-to-end flows: ingesting a directory and answering a
//! query.

use crate::core::config::{Config, QueryConfig};
use crate::core::embed::{build_embedder, embed_in_batches, Embedder};
use crate::core::error::{ChunkwiseError, Result};
use crate::core::pipeline::IngestPipeline;
use crate::core::retrieval::{HitOrdering, MetadataFilter, ResultShaper};
use crate::core::store::{LanceCollection, VectorStore};
use crate::core::types::{ChunkRecord, IngestStats, RankedHit};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Per-query shaping options
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Hits retrieved from the store and the display count
    pub k: usize,
    pub limit_per_doc: Option<usize>,
    pub filter: Option<MetadataFilter>,
    pub min_score: Option<f32>,
    pub document_key: String,
}

impl QueryOptions {
    /// Options taken from the `[query]` config section
    pub fn from_config(config: &QueryConfig) -> Result<Self> {
        Ok(Self {
            k: config.k,
            limit_per_doc: config.limit_per_doc,
            filter: config.metadata_filter()?,
            min_score: config.min_score,
            document_key: config.document_key.clone(),
        })
    }

    fn shaper(&self) -> ResultShaper {
        ResultShaper::new(self.k)
            .with_limit_per_doc(self.limit_per_doc)
            .with_filter(self.filter.clone())
            .with_min_score(self.min_score)
            .with_document_key(self.document_key.clone())
            .with_ordering(HitOrdering::Trusted)
    }
}

/// Result of a query
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub collection: String,
    /// Hits returned by the store before shaping
    pub retrieved: usize,
    pub hits: Vec<RankedHit>,
}

/// Services container
///
/// All CLI commands use this struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Embedding backend chosen by `embedding.provider`
    pub embedder: Arc<dyn Embedder>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    ///
    /// Validates the configuration first, so nothing is read or
    /// written with a bad window or collection name.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let embedder = build_embedder(&config.embedding)?;
        Ok(Self::with_embedder(config, embedder))
    }

    /// Create services with an explicit embedder
    pub fn with_embedder(config: Config, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            config: Arc::new(config),
        }
    }

    /// Open the configured collection
    pub async fn open_collection(&self) -> Result<LanceCollection> {
        LanceCollection::open(
            self.config.storage.persist_dir.clone(),
            &self.config.storage.collection,
        )
        .await
    }

    /// Read, chunk, embed and store every document under `root`
    ///
    /// With `rebuild`, the collection is deleted before anything is
    /// written. Otherwise chunks already stored for the same source
    /// paths are replaced.
    pub async fn ingest(&self, root: &Path, rebuild: bool) -> Result<IngestStats> {
        let pipeline = IngestPipeline::from_config(&self.config)?;
        let (records, mut stats) = pipeline.run(root)?;
        stats.collection = self.config.storage.collection.clone();

        let mut collection = self.open_collection().await?;
        if rebuild {
            let name = collection.name().to_string();
            if collection.delete_collection(&name).await? {
                tracing::info!("Deleted existing collection '{}'", name);
            }
        }
        collection.bind_model(self.embedder.model_id())?;

        if records.is_empty() {
            tracing::warn!("No chunks produced from {:?}", root);
            return Ok(stats);
        }

        let texts: Vec<&str> = records.iter().map(|r| r.content.as_str()).collect();
        let vectors = embed_in_batches(
            self.embedder.as_ref(),
            &texts,
            self.config.embedding.batch_size,
        )
        .await?;

        let removed = collection.remove_sources(&source_paths(&records)).await?;
        if removed > 0 {
            tracing::debug!("Replaced {} previously stored chunks", removed);
        }
        collection.upsert(&records, &vectors).await?;
        Ok(stats)
    }

    /// Embed `text`, search the collection and shape the hits
    pub async fn query(&self, text: &str, options: &QueryOptions) -> Result<QueryOutcome> {
        if text.trim().is_empty() {
            return Err(ChunkwiseError::InputError(
                "Query text must not be empty".to_string(),
            ));
        }

        let name = &self.config.storage.collection;
        if !LanceCollection::exists(&self.config.storage.persist_dir, name) {
            return Err(ChunkwiseError::InvalidCollection(format!(
                "Collection '{}' not found in {:?}; run the pipeline first",
                name, self.config.storage.persist_dir
            )));
        }
        let collection = self.open_collection().await?;

        if let Some(model) = &collection.metadata().model {
            if model != self.embedder.model_id() {
                tracing::warn!(
                    "Collection '{}' was built with model '{}', querying with '{}'",
                    name,
                    model,
                    self.embedder.model_id()
                );
            }
        }

        let vector = self
            .embedder
            .embed_batch(&[text])
            .await?
            .pop()
            .ok_or_else(|| {
                ChunkwiseError::EmbeddingFailed("Embedder returned no vector for query".to_string())
            })?;

        let retrieved = collection.search(&vector, options.k).await?;
        let count = retrieved.len();
        let hits = options.shaper().shape(retrieved);

        tracing::debug!(
            "Query retrieved {} hits, {} after shaping",
            count,
            hits.len()
        );

        Ok(QueryOutcome {
            collection: name.clone(),
            retrieved: count,
            hits,
        })
    }
}

/// Distinct `source_path` values of `records`, in first-seen order
fn source_paths(records: &[ChunkRecord]) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    for path in records.iter().filter_map(|r| r.meta_str("source_path")) {
        if !paths.iter().any(|p| p == path) {
            paths.push(path.to_string());
        }
    }
    paths
}
