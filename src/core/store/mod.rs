//! Vector storage for chunk records.
//!
//! The retrieval side only needs three operations from a store:
//! upsert embedded chunks, search by query vector and drop a whole
//! collection. [`LanceCollection`] implements them on a LanceDB table
//! under the configured persist directory.

pub mod collection;

pub use collection::{CollectionMetadata, LanceCollection, SCHEMA_VERSION};

use async_trait::async_trait;

use crate::core::error::{ChunkwiseError, Result};
use crate::core::types::{ChunkRecord, RetrievalHit};

/// Operations the services need from a vector store
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace records by chunk id. `vectors[i]` is the
    /// embedding of `records[i]`. Returns the number of records
    /// written.
    async fn upsert(&mut self, records: &[ChunkRecord], vectors: &[Vec<f32>]) -> Result<usize>;

    /// Up to `k` hits ordered by descending similarity
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievalHit>>;

    /// Remove a collection and its data. Returns true if anything was
    /// removed.
    async fn delete_collection(&mut self, name: &str) -> Result<bool>;
}

/// Stable identifier of a chunk within a collection.
///
/// Keyed on the source path, so re-ingesting a file replaces its
/// chunks while two files with identical content stay distinct. The
/// document hash is only used for records without a path.
pub fn chunk_id(record: &ChunkRecord) -> String {
    let doc = record
        .meta_str("source_path")
        .or_else(|| record.meta_str("doc_hash"))
        .unwrap_or("anon");
    let index = record
        .chunk_index()
        .map(|i| i.to_string())
        .unwrap_or_else(|| "0".to_string());
    format!("{doc}:{index}")
}

/// Collection names: 1-64 chars of alphanumerics, `-`, `_` or `.`,
/// not starting with a dot.
pub fn validate_collection_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 64 {
        return Err(ChunkwiseError::InvalidCollection(format!(
            "Collection name must be 1-64 characters, got {}",
            name.len()
        )));
    }
    if name.starts_with('.') {
        return Err(ChunkwiseError::InvalidCollection(format!(
            "Collection name '{name}' must not start with '.'"
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(ChunkwiseError::InvalidCollection(format!(
            "Collection name '{name}' contains invalid character '{bad}'"
        )));
    }
    Ok(())
}
