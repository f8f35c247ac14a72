//! chunkwise - document chunking and retrieval shaping
//!
//! Ingests `.docx` and `.rtf` documents, splits them into
//! overlapping, position-tracked windows, stores their embeddings in
//! a local vector collection and shapes nearest-neighbour results at
//! query time.
//!
//! # Architecture
//!
//! The codebase is organized into two modules:
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - chunking (splitters, windowing, chunk metadata)
//!   - retrieval (filters, per-document caps, ranking)
//!   - reader, embed, store (collaborators behind traits)
//!   - pipeline, services (ingest and query flows)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Features
//!
//! - UTF-8 safe windowing (character offsets, never panics)
//! - Separator-aware or tokenizer-measured chunk sizes
//! - Every chunk traceable to its source file and offset
//! - Per-document result caps and metadata filters

// Core domain logic
pub mod core;

// CLI adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{ChunkwiseError, Result};
pub use core::services::Services;
pub use core::types::*;
