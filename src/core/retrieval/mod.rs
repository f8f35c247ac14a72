//! Retrieval-side shaping of vector store results.

pub mod filter;
pub mod shaper;

pub use filter::MetadataFilter;
pub use shaper::{HitOrdering, ResultShaper, DEFAULT_DOCUMENT_KEY, UNKNOWN_DOCUMENT};
