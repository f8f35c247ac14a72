//! Position-aware windowing engine.
//!
//! Splits each source text into overlapping windows with the
//! configured [`TextSplitter`], then recovers every window's
//! character offsets with a forward literal scan over the source.
//!
//! Offsets are measured in characters (Unicode scalar values), the
//! same unit as `total_chars`. Recovery keeps a running cursor: a
//! window is searched for at or after the end of the previous one.
//! When it is not found (the splitter normalized the text, or the
//! window overlaps its predecessor) the cursor itself is used and the
//! record is flagged with `exact_position = false`. The scan costs
//! O(chunks x text length) in the worst case.
//!
//! # Example
//!
//! ```
//! use chunkwise::core::chunking::{CharSplitter, Chunker};
//! use chunkwise::core::types::SourceText;
//!
//! let chunker = Chunker::new(10, 2, Box::new(CharSplitter::hard_cut())).unwrap();
//! let source = SourceText::new("Hello 👋 World 🌍").with_meta("filename", "a.docx");
//! let chunks = chunker.chunk(&[source]).unwrap();
//!
//! assert_eq!(chunks[0].content, "Hello 👋 Wo");
//! assert_eq!(chunks[0].char_start(), Some(0));
//! ```

use chrono::Utc;

use crate::core::chunking::metadata::{synthesize, ChunkPosition};
use crate::core::chunking::splitter::{validate_window, CharSplitter, TextSplitter};
use crate::core::chunking::tokenizer::TokenizerSplitter;
use crate::core::config::{ChunkingConfig, SplitterKind};
use crate::core::error::{ChunkwiseError, Result};
use crate::core::types::{ChunkRecord, SourceText};

/// Windowing engine
pub struct Chunker {
    /// Maximum units per chunk
    chunk_size: usize,

    /// Units shared by consecutive chunks
    overlap_size: usize,

    splitter: Box<dyn TextSplitter>,
}

/// Offsets recovered for one window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Located {
    char_start: usize,
    char_end: usize,
    exact: bool,
}

impl Chunker {
    /// Create a chunker.
    ///
    /// # Errors
    ///
    /// `ConfigError` if `chunk_size <= overlap_size` or either is
    /// zero. This is checked here so a bad configuration fails before
    /// any source text is processed.
    pub fn new(
        chunk_size: usize,
        overlap_size: usize,
        splitter: Box<dyn TextSplitter>,
    ) -> Result<Self> {
        validate_window(chunk_size, overlap_size)?;

        Ok(Self {
            chunk_size,
            overlap_size,
            splitter,
        })
    }

    /// Build a chunker and its splitter from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        validate_window(config.chunk_size, config.overlap_size)?;

        let splitter: Box<dyn TextSplitter> = match config.splitter {
            SplitterKind::Char => Box::new(CharSplitter::new(&config.separators)?),
            SplitterKind::Tokenizer => {
                let path = config.tokenizer_path.as_ref().ok_or_else(|| {
                    ChunkwiseError::ConfigError(
                        "splitter = \"tokenizer\" requires chunking.tokenizer_path".to_string(),
                    )
                })?;
                Box::new(TokenizerSplitter::from_file(path)?)
            }
        };

        Self::new(config.chunk_size, config.overlap_size, splitter)
    }

    /// Get the chunk size in units.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the overlap size in units.
    pub fn overlap_size(&self) -> usize {
        self.overlap_size
    }

    /// Name of the active splitter ("char" or "tokenizer")
    pub fn splitter_name(&self) -> &'static str {
        self.splitter.name()
    }

    /// Chunk a sequence of source texts.
    ///
    /// Output is grouped by source in input order; within a source,
    /// records are in `chunk_index` order. Empty texts yield nothing.
    pub fn chunk(&self, sources: &[SourceText]) -> Result<Vec<ChunkRecord>> {
        let mut records = Vec::new();

        for source in sources {
            let chunks = self.chunk_one(source)?;
            tracing::debug!(
                "Chunked source {:?} into {} chunks",
                source.metadata.get("filename"),
                chunks.len()
            );
            records.extend(chunks);
        }

        tracing::info!(
            "Chunked into {} chunks (size={}, overlap={})",
            records.len(),
            self.chunk_size,
            self.overlap_size
        );

        Ok(records)
    }

    /// Chunk a single source text
    pub fn chunk_one(&self, source: &SourceText) -> Result<Vec<ChunkRecord>> {
        if source.text.is_empty() {
            return Ok(Vec::new());
        }

        let pieces = self
            .splitter
            .split(&source.text, self.chunk_size, self.overlap_size)?;
        let total_chars = source.text.chars().count();
        let located = locate_all(&source.text, &pieces);

        let records = pieces
            .into_iter()
            .zip(located)
            .enumerate()
            .map(|(chunk_index, (content, loc))| {
                let position = ChunkPosition {
                    chunk_index,
                    char_start: loc.char_start,
                    char_end: loc.char_end,
                    total_chars,
                };
                ChunkRecord {
                    content,
                    metadata: synthesize(&source.metadata, &position, Utc::now()),
                    exact_position: loc.exact,
                }
            })
            .collect();

        Ok(records)
    }
}

/// Recover character offsets for each piece with a forward scan.
fn locate_all(text: &str, pieces: &[String]) -> Vec<Located> {
    // Cursor kept in both units; the byte side is clamped to the text
    let mut cursor_char = 0;
    let mut cursor_byte = 0;
    let mut out = Vec::with_capacity(pieces.len());

    for piece in pieces {
        let piece_chars = piece.chars().count();

        match text[cursor_byte..].find(piece.as_str()) {
            Some(rel) => {
                let found_byte = cursor_byte + rel;
                let char_start = cursor_char + text[cursor_byte..found_byte].chars().count();
                let char_end = char_start + piece_chars;

                out.push(Located {
                    char_start,
                    char_end,
                    exact: true,
                });
                cursor_byte = found_byte + piece.len();
                cursor_char = char_end;
            }
            None => {
                let char_start = cursor_char;
                let char_end = char_start + piece_chars;

                out.push(Located {
                    char_start,
                    char_end,
                    exact: false,
                });
                cursor_byte = advance_chars(text, cursor_byte, piece_chars);
                cursor_char = char_end;
            }
        }
    }

    out
}

/// Byte offset `n` chars after `from`, clamped to the end of `text`
fn advance_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map(|(b, _)| from + b)
        .unwrap_or(text.len())
}
