//! Model-token splitting backed by a Hugging Face `tokenizer.json`.
//!
//! Windows are formed over token ids and mapped back to text through
//! the encoding offsets, so in the common case every run is a literal
//! slice of the input. A window runs from its first token's start to
//! the next window token's start; the first window starts at byte 0
//! and the last one ends at the end of the text, so whitespace between
//! and around tokens is never dropped. Byte-level vocabularies can
//! produce offsets that do not fall on `char` boundaries; such windows
//! are decoded instead, and the resulting text may not occur verbatim
//! in the source.

use std::path::Path;

use tokenizers::{Encoding, Tokenizer};

use crate::core::chunking::splitter::{validate_window, TextSplitter};
use crate::core::error::{ChunkwiseError, Result};

/// Splitter measuring text in model tokens
pub struct TokenizerSplitter {
    tokenizer: Tokenizer,
}

impl TokenizerSplitter {
    /// Load a tokenizer from a `tokenizer.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            ChunkwiseError::TokenizerError(format!(
                "Failed to load tokenizer from {}: {e}",
                path.display()
            ))
        })?;
        tracing::debug!("Loaded tokenizer from {:?}", path);
        Ok(Self { tokenizer })
    }

    /// Wrap an already constructed tokenizer
    pub fn from_tokenizer(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    fn encode(&self, text: &str) -> Result<Encoding> {
        self.tokenizer
            .encode(text, false)
            .map_err(|e| ChunkwiseError::TokenizerError(format!("Tokenization failed: {e}")))
    }

    /// Text of the byte range `lo..hi`, or the decoded window `ids`
    /// when that range is not a valid `str` slice
    fn window_text(&self, text: &str, ids: &[u32], lo: usize, hi: usize) -> Result<String> {
        if let Some(slice) = text.get(lo..hi) {
            return Ok(slice.to_string());
        }

        tracing::debug!(
            "Token offsets {}..{} are not on char boundaries, decoding window",
            lo,
            hi
        );
        self.tokenizer
            .decode(ids, false)
            .map_err(|e| ChunkwiseError::TokenizerError(format!("Decoding failed: {e}")))
    }
}

impl TextSplitter for TokenizerSplitter {
    fn name(&self) -> &'static str {
        "tokenizer"
    }

    fn count(&self, text: &str) -> Result<usize> {
        Ok(self.encode(text)?.len())
    }

    fn split(&self, text: &str, max_units: usize, overlap_units: usize) -> Result<Vec<String>> {
        validate_window(max_units, overlap_units)?;

        if text.is_empty() {
            return Ok(Vec::new());
        }

        let encoding = self.encode(text)?;
        let ids = encoding.get_ids();
        let offsets = encoding.get_offsets();
        let total = ids.len();

        // Text the model sees as no tokens at all (e.g. only whitespace)
        if total == 0 {
            return Ok(vec![text.to_string()]);
        }

        let mut runs = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + max_units).min(total);
            let lo = if start == 0 { 0 } else { offsets[start].0 };
            let hi = if end == total { text.len() } else { offsets[end].0 };
            runs.push(self.window_text(text, &ids[start..end], lo, hi)?);
            if end == total {
                break;
            }
            start = end - overlap_units;
        }

        Ok(runs)
    }
}
