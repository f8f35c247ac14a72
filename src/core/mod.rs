//! Core domain logic (transport-agnostic)
//!
//! This module contains all business logic that is independent
//! of the command-line surface.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **chunking**: Splitters, windowing engine, metadata synthesis
//! - **retrieval**: Metadata filters and result shaping
//! - **reader**: Directory walking and `.docx`/`.rtf` extraction
//! - **embed**: Embedding backends
//! - **store**: File-backed vector collections
//! - **pipeline**: Read and chunk orchestration
//! - **services**: Service container for ingest and query

pub mod chunking;
pub mod config;
pub mod embed;
pub mod error;
pub mod pipeline;
pub mod reader;
pub mod retrieval;
pub mod services;
pub mod store;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{ChunkwiseError, Result};
pub use services::Services;
