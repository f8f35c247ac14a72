//! Chunk metadata synthesis.
//!
//! Merges caller-supplied document metadata with the positional
//! and provenance fields computed by the windowing engine. Caller
//! entries are written first and reserved keys second, so a
//! reserved key can never be shadowed by caller input.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::types::{ChunkMetadata, MetaValue, Metadata};

pub const CHUNK_INDEX: &str = "chunk_index";
pub const CHAR_START: &str = "char_start";
pub const CHAR_END: &str = "char_end";
pub const TOTAL_CHARS: &str = "total_chars";
pub const INGESTED_AT: &str = "ingested_at";

/// Keys owned by the synthesizer
pub const RESERVED_KEYS: [&str; 5] = [CHUNK_INDEX, CHAR_START, CHAR_END, TOTAL_CHARS, INGESTED_AT];

/// Positional fields computed for one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPosition {
    pub chunk_index: usize,
    pub char_start: usize,
    pub char_end: usize,
    pub total_chars: usize,
}

/// Returns true if `key` is written by the synthesizer
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Build the final metadata mapping for a chunk.
pub fn synthesize(
    caller: &Metadata,
    position: &ChunkPosition,
    ingested_at: DateTime<Utc>,
) -> ChunkMetadata {
    let mut meta: ChunkMetadata = caller
        .iter()
        .map(|(k, v)| (k.clone(), MetaValue::Str(v.clone())))
        .collect();

    meta.insert(CHUNK_INDEX.to_string(), position.chunk_index.into());
    meta.insert(CHAR_START.to_string(), position.char_start.into());
    meta.insert(CHAR_END.to_string(), position.char_end.into());
    meta.insert(TOTAL_CHARS.to_string(), position.total_chars.into());
    meta.insert(
        INGESTED_AT.to_string(),
        MetaValue::Str(ingested_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
    );

    meta
}
