//! Error types and error handling for chunkwise.
//!
//! This module defines the error types used throughout the
//! crate. Presentation (CLI exit codes, colored messages) is
//! handled in the respective adapter modules.

use thiserror::Error;

/// Result type alias for chunkwise operations
pub type Result<T> = std::result::Result<T, ChunkwiseError>;

/// Main error type for chunkwise
#[derive(Error, Debug)]
pub enum ChunkwiseError {
    /// Invalid size/overlap relationship, separator pattern or provider.
    /// Raised before any output is produced.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed filter or metadata at the result shaper boundary
    #[error("Invalid input: {0}")]
    InputError(String),

    /// A single document could not be parsed; callers skip and continue
    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Tokenizer error: {0}")]
    TokenizerError(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Invalid collection: {0}")]
    InvalidCollection(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Vector store error: {0}")]
    LanceError(#[from] lancedb::Error),

    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow_schema::ArrowError),
}

impl ChunkwiseError {
    /// Build a parse error for a document path
    pub fn parse(path: impl AsRef<std::path::Path>, message: impl Into<String>) -> Self {
        ChunkwiseError::ParseError {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a bad request error (invalid caller input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            ChunkwiseError::ConfigError(_)
                | ChunkwiseError::InputError(_)
                | ChunkwiseError::InvalidCollection(_)
                | ChunkwiseError::InvalidPath(_)
        )
    }

    /// Check if the failure only affects one document
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChunkwiseError::ParseError { .. })
    }
}
