//! Unit-based text splitting.
//!
//! A [`TextSplitter`] measures text in atomic units and cuts it into
//! overlapping runs of at most `max_units` units. Consecutive runs
//! share exactly `overlap_units` units; only the final run may be
//! shorter.
//!
//! [`CharSplitter`] treats every `char` as a unit, so it never cuts
//! inside a multi-byte UTF-8 sequence. Inside each window it prefers
//! to cut after a separator, trying separators in priority order,
//! and falls back to a hard cut at `max_units`.
//!
//! # Example
//!
//! ```
//! use chunkwise::core::chunking::{CharSplitter, TextSplitter};
//!
//! let splitter = CharSplitter::with_defaults();
//! let runs = splitter.split("One. Two. Three.", 10, 2).unwrap();
//! assert_eq!(runs, vec!["One. Two. ", ". Three."]);
//! ```

use regex::Regex;

use crate::core::error::{ChunkwiseError, Result};

/// Maps text to units and splits it into overlapping runs
pub trait TextSplitter: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Number of units in `text`
    fn count(&self, text: &str) -> Result<usize>;

    /// Split `text` into runs of at most `max_units` units that
    /// overlap by `overlap_units`.
    fn split(&self, text: &str, max_units: usize, overlap_units: usize) -> Result<Vec<String>>;
}

/// Reject window settings that would never terminate.
pub fn validate_window(max_units: usize, overlap_units: usize) -> Result<()> {
    if max_units == 0 {
        return Err(ChunkwiseError::ConfigError(
            "Chunk size must be non-zero".to_string(),
        ));
    }
    if overlap_units == 0 {
        return Err(ChunkwiseError::ConfigError(
            "Overlap size must be non-zero".to_string(),
        ));
    }
    if overlap_units >= max_units {
        return Err(ChunkwiseError::ConfigError(format!(
            "Overlap size ({overlap_units}) must be less than chunk size ({max_units})"
        )));
    }
    Ok(())
}

/// Default separator patterns, highest priority first:
/// paragraph break, line break, sentence end, whitespace.
pub fn default_separators() -> Vec<String> {
    vec![
        "\n\n".to_string(),
        "\n".to_string(),
        r"[.!?]\s".to_string(),
        r"\s".to_string(),
    ]
}

/// Character-based splitter with separator preferences
#[derive(Debug, Clone)]
pub struct CharSplitter {
    separators: Vec<Regex>,
}

impl CharSplitter {
    /// Create a splitter from separator patterns (regular expressions),
    /// highest priority first.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let separators = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    ChunkwiseError::ConfigError(format!("Invalid separator pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { separators })
    }

    /// Splitter using [`default_separators`]
    pub fn with_defaults() -> Self {
        let separators = default_separators()
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self { separators }
    }

    /// Splitter that always hard-cuts at the window size
    pub fn hard_cut() -> Self {
        Self {
            separators: Vec::new(),
        }
    }

    /// Number of configured separators
    pub fn separator_count(&self) -> usize {
        self.separators.len()
    }

    /// Pick the cut position (char index, exclusive) for the window
    /// `[start, hard_end)`.
    ///
    /// The cut must land after `start + overlap` so the next window
    /// starts strictly later than this one.
    fn find_cut(
        &self,
        text: &str,
        byte_at: &dyn Fn(usize) -> usize,
        start: usize,
        hard_end: usize,
        overlap: usize,
    ) -> Option<usize> {
        let window = &text[byte_at(start)..byte_at(hard_end)];
        let min_end = start + overlap + 1;

        for separator in &self.separators {
            // Matches come in increasing order, so only the last
            // non-empty one can be the latest cut.
            let last = separator
                .find_iter(window)
                .filter(|m| !m.as_str().is_empty())
                .last();

            if let Some(m) = last {
                let cut = start + window[..m.end()].chars().count();
                if cut >= min_end {
                    return Some(cut);
                }
            }
        }

        None
    }
}

impl Default for CharSplitter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TextSplitter for CharSplitter {
    fn name(&self) -> &'static str {
        "char"
    }

    fn count(&self, text: &str) -> Result<usize> {
        Ok(text.chars().count())
    }

    fn split(&self, text: &str, max_units: usize, overlap_units: usize) -> Result<Vec<String>> {
        validate_window(max_units, overlap_units)?;

        // Byte offset of every char; boundaries taken from here are
        // always valid UTF-8 slice points.
        let char_starts: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        let total = char_starts.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let byte_at = |idx: usize| {
            if idx < total {
                char_starts[idx]
            } else {
                text.len()
            }
        };

        let mut runs = Vec::new();
        let mut start = 0;

        loop {
            let hard_end = (start + max_units).min(total);
            if hard_end == total {
                runs.push(text[byte_at(start)..].to_string());
                break;
            }

            let cut = self
                .find_cut(text, &byte_at, start, hard_end, overlap_units)
                .unwrap_or(hard_end);

            runs.push(text[byte_at(start)..byte_at(cut)].to_string());
            start = cut - overlap_units;
        }

        Ok(runs)
    }
}
