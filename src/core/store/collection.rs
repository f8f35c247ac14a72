//! LanceDB-backed vector collection.
//!
//! Layout under the persist directory:
//!
//! ```text
//! {persist_dir}/collections/{name}/meta.json     CollectionMetadata
//! {persist_dir}/collections/{name}/chunks.lance  LanceDB table
//! ```
//!
//! Rows carry the chunk id, source path, content, metadata (as JSON)
//! and a fixed-size vector whose length is set by the first upsert.
//! Upserts merge on `id`; search is a cosine nearest-neighbour query
//! whose `_distance` is turned back into a similarity.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::types::Float32Type;
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, Int64Array, RecordBatch, RecordBatchIterator,
    RecordBatchReader, StringArray,
};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection, DistanceType};
use serde::{Deserialize, Serialize};

use crate::core::error::{ChunkwiseError, Result};
use crate::core::store::{chunk_id, validate_collection_name, VectorStore};
use crate::core::types::{ChunkRecord, RetrievalHit};

/// On-disk format version
pub const SCHEMA_VERSION: u32 = 2;

const META_FILE: &str = "meta.json";
const TABLE_NAME: &str = "chunks";

/// Collection metadata (meta.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub name: String,
    /// Vector length, fixed by the first upsert
    pub dimensions: Option<usize>,
    /// Embedding model the vectors came from
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub chunk_count: usize,
    pub schema_version: u32,
}

impl CollectionMetadata {
    fn empty(name: &str) -> Self {
        let now = Utc::now();
        Self {
            name: name.to_string(),
            dimensions: None,
            model: None,
            created_at: now,
            updated_at: now,
            chunk_count: 0,
            schema_version: SCHEMA_VERSION,
        }
    }
}

/// A named collection stored in its own LanceDB database
pub struct LanceCollection {
    persist_dir: PathBuf,
    metadata: CollectionMetadata,
    db: Connection,
}

impl LanceCollection {
    /// Open a collection, loading its metadata when it exists.
    ///
    /// A missing collection has no table until the first upsert.
    pub async fn open(persist_dir: impl Into<PathBuf>, name: &str) -> Result<Self> {
        validate_collection_name(name)?;
        let persist_dir = persist_dir.into();
        let dir = collection_dir(&persist_dir, name);

        let meta_path = dir.join(META_FILE);
        let metadata = if meta_path.exists() {
            let metadata: CollectionMetadata =
                serde_json::from_str(&fs::read_to_string(&meta_path)?)?;
            if metadata.schema_version != SCHEMA_VERSION {
                return Err(ChunkwiseError::StorageError(format!(
                    "Collection '{}' uses schema version {} (supported: {}); rebuild it",
                    name, metadata.schema_version, SCHEMA_VERSION
                )));
            }
            tracing::debug!(
                "Opened collection '{}' ({} chunks)",
                name,
                metadata.chunk_count
            );
            metadata
        } else {
            tracing::debug!("Collection '{}' not found at {:?}, starting empty", name, dir);
            CollectionMetadata::empty(name)
        };

        let db = connect_dir(&dir).await?;
        Ok(Self {
            persist_dir,
            metadata,
            db,
        })
    }

    /// True if the collection has been written to `persist_dir`
    pub fn exists(persist_dir: &Path, name: &str) -> bool {
        collection_dir(persist_dir, name).join(META_FILE).exists()
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn metadata(&self) -> &CollectionMetadata {
        &self.metadata
    }

    /// Directory holding this collection's files
    pub fn path(&self) -> PathBuf {
        collection_dir(&self.persist_dir, &self.metadata.name)
    }

    /// Number of stored chunks
    pub async fn count(&self) -> Result<usize> {
        if !self.has_table().await? {
            return Ok(0);
        }
        let table = self.db.open_table(TABLE_NAME).execute().await?;
        Ok(table.count_rows(None).await?)
    }

    /// Record the embedding model, rejecting a different model than
    /// the one already stored.
    pub fn bind_model(&mut self, model: &str) -> Result<()> {
        match &self.metadata.model {
            Some(existing) if existing != model && self.metadata.chunk_count > 0 => {
                Err(ChunkwiseError::StorageError(format!(
                    "Collection '{}' was built with model '{}', not '{}'; rebuild it to switch models",
                    self.metadata.name, existing, model
                )))
            }
            _ => {
                self.metadata.model = Some(model.to_string());
                Ok(())
            }
        }
    }

    /// Delete every chunk whose `source_path` is in `source_paths`.
    ///
    /// Used before re-ingesting documents so a file that now yields
    /// fewer chunks leaves no stale tail behind. Returns the number of
    /// rows removed.
    pub async fn remove_sources(&mut self, source_paths: &[String]) -> Result<usize> {
        if source_paths.is_empty() || !self.has_table().await? {
            return Ok(0);
        }
        let table = self.db.open_table(TABLE_NAME).execute().await?;
        let before = table.count_rows(None).await?;

        let quoted: Vec<String> = source_paths.iter().map(|p| sql_string(p)).collect();
        table
            .delete(&format!("source_path IN ({})", quoted.join(", ")))
            .await?;

        let after = table.count_rows(None).await?;
        if after != self.metadata.chunk_count {
            self.metadata.chunk_count = after;
            self.write_metadata()?;
        }
        Ok(before.saturating_sub(after))
    }

    async fn has_table(&self) -> Result<bool> {
        let names = self.db.table_names().execute().await?;
        Ok(names.iter().any(|n| n == TABLE_NAME))
    }

    fn write_metadata(&mut self) -> Result<()> {
        let dir = self.path();
        fs::create_dir_all(&dir)?;
        self.metadata.updated_at = Utc::now();
        write_atomic(
            &dir.join(META_FILE),
            serde_json::to_string_pretty(&self.metadata)?.as_bytes(),
        )
    }
}

#[async_trait]
impl VectorStore for LanceCollection {
    async fn upsert(&mut self, records: &[ChunkRecord], vectors: &[Vec<f32>]) -> Result<usize> {
        if records.len() != vectors.len() {
            return Err(ChunkwiseError::StorageError(format!(
                "Got {} records but {} vectors",
                records.len(),
                vectors.len()
            )));
        }
        if records.is_empty() {
            return Ok(0);
        }

        let dims = self.metadata.dimensions.unwrap_or(vectors[0].len());
        if let Some(bad) = vectors.iter().find(|v| v.len() != dims) {
            return Err(ChunkwiseError::StorageError(format!(
                "Vector dimension mismatch: collection '{}' expects {}, got {}",
                self.metadata.name,
                dims,
                bad.len()
            )));
        }

        let batch = to_record_batch(records, vectors, dims)?;
        let schema = batch.schema();
        let reader: Box<dyn RecordBatchReader + Send> =
            Box::new(RecordBatchIterator::new(vec![Ok(batch)], schema));

        if self.has_table().await? {
            let table = self.db.open_table(TABLE_NAME).execute().await?;
            let mut merge = table.merge_insert(&["id"]);
            merge
                .when_matched_update_all(None)
                .when_not_matched_insert_all();
            merge.execute(reader).await?;
        } else {
            self.db.create_table(TABLE_NAME, reader).execute().await?;
        }

        self.metadata.dimensions = Some(dims);
        self.metadata.chunk_count = self.count().await?;
        self.write_metadata()?;

        tracing::info!(
            "Upserted {} chunks into collection '{}' at {:?}",
            records.len(),
            self.metadata.name,
            self.persist_dir
        );

        Ok(records.len())
    }

    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievalHit>> {
        if k == 0 || !self.has_table().await? {
            return Ok(Vec::new());
        }
        if let Some(dims) = self.metadata.dimensions {
            if query.len() != dims {
                return Err(ChunkwiseError::StorageError(format!(
                    "Query vector has {} dimensions, collection '{}' has {}",
                    query.len(),
                    self.metadata.name,
                    dims
                )));
            }
        }

        let table = self.db.open_table(TABLE_NAME).execute().await?;
        let mut stream = table
            .vector_search(query.to_vec())?
            .distance_type(DistanceType::Cosine)
            .limit(k)
            .execute()
            .await?;

        let mut hits = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            let contents = string_column(&batch, "content")?;
            let metadata = string_column(&batch, "metadata")?;
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
                .ok_or_else(|| {
                    ChunkwiseError::StorageError("Search result has no _distance column".into())
                })?;

            for i in 0..batch.num_rows() {
                hits.push(RetrievalHit {
                    content: contents.value(i).to_string(),
                    metadata: serde_json::from_str(metadata.value(i))?,
                    score: similarity(distances.value(i)),
                });
            }
        }

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }

    async fn delete_collection(&mut self, name: &str) -> Result<bool> {
        validate_collection_name(name)?;
        let dir = collection_dir(&self.persist_dir, name);
        let existed = dir.join(META_FILE).exists();

        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        if existed {
            tracing::info!("Deleted existing collection: {}", name);
        }

        if name == self.metadata.name {
            let model = self.metadata.model.take();
            self.metadata = CollectionMetadata::empty(name);
            self.metadata.model = model;
            self.db = connect_dir(&dir).await?;
        }

        Ok(existed)
    }
}

fn collection_dir(persist_dir: &Path, name: &str) -> PathBuf {
    persist_dir.join("collections").join(name)
}

async fn connect_dir(dir: &Path) -> Result<Connection> {
    fs::create_dir_all(dir)?;
    Ok(connect(dir.to_string_lossy().as_ref()).execute().await?)
}

fn chunk_schema(dims: i32) -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("source_path", DataType::Utf8, false),
        Field::new("chunk_index", DataType::Int64, false),
        Field::new("content", DataType::Utf8, false),
        Field::new("metadata", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dims),
            true,
        ),
    ]))
}

fn to_record_batch(
    records: &[ChunkRecord],
    vectors: &[Vec<f32>],
    dims: usize,
) -> Result<RecordBatch> {
    let dims = i32::try_from(dims).map_err(|_| {
        ChunkwiseError::StorageError(format!("Vector dimension {dims} is too large"))
    })?;

    let ids: Vec<String> = records.iter().map(chunk_id).collect();
    let sources: Vec<&str> = records
        .iter()
        .map(|r| r.meta_str("source_path").unwrap_or(""))
        .collect();
    let indices: Vec<i64> = records
        .iter()
        .map(|r| r.chunk_index().unwrap_or(0) as i64)
        .collect();
    let contents: Vec<&str> = records.iter().map(|r| r.content.as_str()).collect();
    let metadata = records
        .iter()
        .map(|r| serde_json::to_string(&r.metadata))
        .collect::<serde_json::Result<Vec<String>>>()?;
    let vectors = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
        vectors.iter().map(|v| Some(v.iter().copied().map(Some))),
        dims,
    );

    Ok(RecordBatch::try_new(
        chunk_schema(dims),
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(sources)),
            Arc::new(Int64Array::from(indices)),
            Arc::new(StringArray::from(contents)),
            Arc::new(StringArray::from(metadata)),
            Arc::new(vectors),
        ],
    )?)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| ChunkwiseError::StorageError(format!("Search result has no {name} column")))
}

/// Cosine distance back to similarity; zero-norm vectors score 0.0
fn similarity(distance: f32) -> f32 {
    if distance.is_finite() {
        1.0 - distance
    } else {
        0.0
    }
}

/// Quote a value for a LanceDB filter expression
fn sql_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Write through a temporary file and rename into place
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
