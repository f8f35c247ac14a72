//! Core data types for chunkwise.
//!
//! This module defines the data structures that flow through the
//! chunking and retrieval pipeline: source texts, chunk records,
//! retrieval hits and ingest statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Caller-supplied document metadata (flat string mapping)
pub type Metadata = BTreeMap<String, String>;

/// Metadata attached to a chunk: caller keys plus reserved keys
pub type ChunkMetadata = BTreeMap<String, MetaValue>;

/// A single metadata value on a chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Int(i64),
    Str(String),
}

impl MetaValue {
    /// Integer view, if this value is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetaValue::Int(v) => Some(*v),
            MetaValue::Str(_) => None,
        }
    }

    /// String view, if this value is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            MetaValue::Int(_) => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Int(v) => write!(f, "{v}"),
            MetaValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Str(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Str(value.to_string())
    }
}

impl From<usize> for MetaValue {
    fn from(value: usize) -> Self {
        MetaValue::Int(value as i64)
    }
}

/// Input unit to the windowing engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceText {
    /// Full extracted text of the document
    pub text: String,

    /// Caller-defined metadata (source path, filename, hash, ...)
    #[serde(default)]
    pub metadata: Metadata,
}

impl SourceText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Add a caller metadata entry
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A chunk of a source text, ready to be embedded and stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// The chunk's literal text
    pub content: String,

    /// Caller metadata merged with reserved positional fields
    pub metadata: ChunkMetadata,

    /// False when offsets came from the cursor fallback rather than
    /// a literal match in the source text
    #[serde(default = "default_exact")]
    pub exact_position: bool,
}

fn default_exact() -> bool {
    true
}

impl ChunkRecord {
    fn int_field(&self, key: &str) -> Option<usize> {
        self.metadata
            .get(key)
            .and_then(MetaValue::as_int)
            .map(|v| v as usize)
    }

    /// Sequential chunk number within the source text
    pub fn chunk_index(&self) -> Option<usize> {
        self.int_field(crate::core::chunking::metadata::CHUNK_INDEX)
    }

    /// Character offset where the chunk starts
    pub fn char_start(&self) -> Option<usize> {
        self.int_field(crate::core::chunking::metadata::CHAR_START)
    }

    /// Character offset where the chunk ends (exclusive)
    pub fn char_end(&self) -> Option<usize> {
        self.int_field(crate::core::chunking::metadata::CHAR_END)
    }

    /// Length of the whole source text in characters
    pub fn total_chars(&self) -> Option<usize> {
        self.int_field(crate::core::chunking::metadata::TOTAL_CHARS)
    }

    /// String metadata lookup
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(MetaValue::as_str)
    }
}

/// A ranked result returned by a similarity search
///
/// `score` follows the "higher is more similar" convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalHit {
    /// Chunk text content
    pub content: String,

    /// Chunk metadata as stored
    pub metadata: ChunkMetadata,

    /// Similarity score (higher = more similar)
    pub score: f32,
}

impl RetrievalHit {
    /// Metadata value rendered as a string; missing keys render as ""
    pub fn meta_string(&self, key: &str) -> String {
        self.metadata
            .get(key)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

/// A hit accepted by the result shaper, with its dense 1-based rank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedHit {
    pub rank: usize,
    pub hit: RetrievalHit,
}

/// Statistics from an ingest run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    /// Number of documents successfully parsed
    pub files_indexed: usize,

    /// Number of documents skipped because parsing failed
    pub files_skipped: usize,

    /// Total chunks created
    pub chunks_created: usize,

    /// Sum of characters over all parsed documents
    pub total_chars: usize,

    /// Mean chunk length in characters
    pub avg_chunk_chars: f64,

    /// Ingest duration in milliseconds
    pub duration_ms: u64,

    /// Target collection
    pub collection: String,
}
