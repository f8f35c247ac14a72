//! Ingest pipeline orchestration.
//!
//! Coordinates the document side of an ingest run:
//! 1. Walk the input directory
//! 2. Parse supported documents into plain text
//! 3. Window the text into chunk records
//!
//! Embedding and storage are handled by [`Services`](crate::core::Services).

use std::path::Path;
use std::time::Instant;

use crate::core::chunking::Chunker;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::reader::DocumentReader;
use crate::core::types::{ChunkRecord, IngestStats};

/// Orchestrates reading and chunking
pub struct IngestPipeline {
    reader: DocumentReader,
    chunker: Chunker,
}

impl IngestPipeline {
    pub fn new(reader: DocumentReader, chunker: Chunker) -> Self {
        Self { reader, chunker }
    }

    /// Build the reader and chunker from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let reader = DocumentReader::new(&config.reader)?;
        let chunker = Chunker::from_config(&config.chunking)?;
        Ok(Self::new(reader, chunker))
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Read and chunk every supported document under `root`
    ///
    /// Documents that fail to parse are logged and counted in
    /// `files_skipped`; they do not stop the run. The returned stats
    /// leave `collection` empty for the caller to fill.
    pub fn run(&self, root: &Path) -> Result<(Vec<ChunkRecord>, IngestStats)> {
        let start = Instant::now();

        tracing::info!("Starting document collection from {:?}", root);
        let outcome = self.reader.read_with_stats(root)?;
        tracing::info!(
            "Parsed {} documents ({} skipped)",
            outcome.documents.len(),
            outcome.skipped
        );

        let mut records = Vec::new();
        let mut total_chars = 0;
        for doc in &outcome.documents {
            total_chars += doc.total_chars;
            if doc.text.is_empty() {
                tracing::debug!("Skipping empty document: {}", doc.source_path);
                continue;
            }

            let chunks = self.chunker.chunk_one(&doc.to_source_text())?;
            tracing::debug!("Chunked {} ({} chunks)", doc.filename, chunks.len());
            records.extend(chunks);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let avg_chunk_chars = average_chunk_chars(&records);

        tracing::info!(
            "Ingest complete: {} files indexed, {} skipped, \
             {} chunks created in {}ms",
            outcome.documents.len(),
            outcome.skipped,
            records.len(),
            duration_ms
        );

        let stats = IngestStats {
            files_indexed: outcome.documents.len(),
            files_skipped: outcome.skipped,
            chunks_created: records.len(),
            total_chars,
            avg_chunk_chars,
            duration_ms,
            collection: String::new(), // Filled by caller
        };

        Ok((records, stats))
    }
}

/// Mean chunk length in characters, 0.0 for no chunks
pub fn average_chunk_chars(records: &[ChunkRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: usize = records.iter().map(|r| r.content.chars().count()).sum();
    total as f64 / records.len() as f64
}
