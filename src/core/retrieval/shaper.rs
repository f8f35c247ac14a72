//! Query-time result shaping.
//!
//! Takes the ranked hits returned by a vector store and applies, in a
//! single pass: metadata filtering, an optional score cutoff,
//! per-document capping and display-count truncation. Accepted hits
//! get dense 1-based ranks and keep their input relative order.
//!
//! # Example
//!
//! ```
//! use chunkwise::core::retrieval::ResultShaper;
//!
//! let shaper = ResultShaper::new(5).with_limit_per_doc(Some(2));
//! assert!(shaper.shape(Vec::new()).is_empty());
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::retrieval::filter::MetadataFilter;
use crate::core::types::{RankedHit, RetrievalHit};

/// Document key used when the hit has no document-identifying field
pub const UNKNOWN_DOCUMENT: &str = "<unknown>";

/// Default metadata key identifying a hit's document
pub const DEFAULT_DOCUMENT_KEY: &str = "filename";

/// How the shaper treats the order of incoming hits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HitOrdering {
    /// Hits are already sorted by descending relevance
    #[default]
    Trusted,

    /// Stable re-sort by descending score first (NaN scores last)
    Descending,
}

/// Filters, caps and ranks retrieval hits
#[derive(Debug, Clone)]
pub struct ResultShaper {
    display_count: usize,
    limit_per_doc: Option<usize>,
    filter: Option<MetadataFilter>,
    min_score: Option<f32>,
    document_key: String,
    ordering: HitOrdering,
}

impl ResultShaper {
    /// Shaper returning at most `display_count` hits
    pub fn new(display_count: usize) -> Self {
        Self {
            display_count,
            limit_per_doc: None,
            filter: None,
            min_score: None,
            document_key: DEFAULT_DOCUMENT_KEY.to_string(),
            ordering: HitOrdering::Trusted,
        }
    }

    pub fn with_limit_per_doc(mut self, limit: Option<usize>) -> Self {
        self.limit_per_doc = limit;
        self
    }

    pub fn with_filter(mut self, filter: Option<MetadataFilter>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }

    /// Skip hits scoring below `min_score`
    pub fn with_min_score(mut self, min_score: Option<f32>) -> Self {
        self.min_score = min_score;
        self
    }

    /// Metadata key used for per-document capping
    pub fn with_document_key(mut self, key: impl Into<String>) -> Self {
        self.document_key = key.into();
        self
    }

    pub fn with_ordering(mut self, ordering: HitOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn display_count(&self) -> usize {
        self.display_count
    }

    pub fn limit_per_doc(&self) -> Option<usize> {
        self.limit_per_doc
    }

    /// Apply filtering, capping and truncation.
    pub fn shape(&self, mut hits: Vec<RetrievalHit>) -> Vec<RankedHit> {
        if self.display_count == 0 || self.limit_per_doc == Some(0) {
            return Vec::new();
        }

        if self.ordering == HitOrdering::Descending {
            hits.sort_by(|a, b| compare_desc(a.score, b.score));
        }

        let total = hits.len();
        let mut per_doc: HashMap<String, usize> = HashMap::new();
        let mut out = Vec::with_capacity(self.display_count.min(total));

        for hit in hits {
            if out.len() >= self.display_count {
                break;
            }

            if let Some(filter) = &self.filter {
                if !filter.matches(&hit) {
                    continue;
                }
            }

            if let Some(min) = self.min_score {
                if hit.score.is_nan() || hit.score < min {
                    continue;
                }
            }

            let doc = self.document_of(&hit);
            let seen = per_doc.entry(doc).or_insert(0);
            if let Some(limit) = self.limit_per_doc {
                if *seen >= limit {
                    continue;
                }
            }
            *seen += 1;

            out.push(RankedHit {
                rank: out.len() + 1,
                hit,
            });
        }

        tracing::debug!(
            "Shaped {} hits into {} results ({} documents)",
            total,
            out.len(),
            per_doc.len()
        );

        out
    }

    fn document_of(&self, hit: &RetrievalHit) -> String {
        hit.metadata
            .get(&self.document_key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| UNKNOWN_DOCUMENT.to_string())
    }
}

/// Descending by score, NaN sorted last
fn compare_desc(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
