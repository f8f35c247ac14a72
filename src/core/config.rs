//! Configuration management for chunkwise.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with defaults for all settings. It is the
//! only place that reads the process environment; every component
//! receives its section of [`Config`] through its constructor.

use crate::core::chunking::splitter::{default_separators, validate_window, CharSplitter};
use crate::core::embed::{PROVIDER_HASHING, PROVIDER_OLLAMA};
use crate::core::error::{ChunkwiseError, Result};
use crate::core::retrieval::{MetadataFilter, DEFAULT_DOCUMENT_KEY};
use crate::core::store::validate_collection_name;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

/// How chunk sizes are measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitterKind {
    /// One unit per character, separator-aware cuts
    #[default]
    Char,
    /// One unit per model token from a `tokenizer.json`
    Tokenizer,
}

/// Chunking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Maximum units per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Units shared by consecutive chunks
    #[serde(default = "default_overlap_size")]
    pub overlap_size: usize,

    /// Separator regexes, highest priority first (char splitter only)
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,

    #[serde(default)]
    pub splitter: SplitterKind,

    /// Path to a Hugging Face `tokenizer.json` (tokenizer splitter only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer_path: Option<PathBuf>,
}

/// Document reader configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaderConfig {
    /// Glob for input files, brace groups allowed
    #[serde(default = "default_file_glob")]
    pub file_glob: String,

    /// Stop after this many files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files: Option<usize>,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,
}

/// Embedding configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// "ollama" or "hashing"
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Ollama base URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Vector length of the hashing provider
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Texts sent per embedding request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory for collections
    #[serde(default = "default_persist_dir")]
    pub persist_dir: PathBuf,

    #[serde(default = "default_collection")]
    pub collection: String,
}

/// Query configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    /// Number of results to retrieve and display
    #[serde(default = "default_k")]
    pub k: usize,

    #[serde(default)]
    pub include_scores: bool,

    /// Maximum results per document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_per_doc: Option<usize>,

    /// Drop hits scoring below this similarity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f32>,

    /// Metadata key identifying a hit's document
    #[serde(default = "default_document_key")]
    pub document_key: String,

    /// Flat metadata equality filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<serde_json::Value>,
}

// Default value functions
fn default_chunk_size() -> usize {
    512
}

fn default_overlap_size() -> usize {
    128
}

fn default_file_glob() -> String {
    "**/*.{docx,rtf}".to_string()
}

fn default_max_file_size() -> usize {
    50
}

fn default_provider() -> String {
    PROVIDER_OLLAMA.to_string()
}

fn default_model() -> String {
    "FRIDA".to_string()
}

fn default_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_dimensions() -> usize {
    384
}

fn default_batch_size() -> usize {
    32
}

fn default_persist_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_collection() -> String {
    "rag-docs".to_string()
}

fn default_k() -> usize {
    8
}

fn default_document_key() -> String {
    DEFAULT_DOCUMENT_KEY.to_string()
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap_size: default_overlap_size(),
            separators: default_separators(),
            splitter: SplitterKind::default(),
            tokenizer_path: None,
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            file_glob: default_file_glob(),
            max_files: None,
            max_file_size_mb: default_max_file_size(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            url: default_url(),
            dimensions: default_dimensions(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            persist_dir: default_persist_dir(),
            collection: default_collection(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            include_scores: false,
            limit_per_doc: None,
            min_score: None,
            document_key: default_document_key(),
            filters: None,
        }
    }
}

impl QueryConfig {
    /// Parsed metadata filter, if one is configured
    pub fn metadata_filter(&self) -> Result<Option<MetadataFilter>> {
        self.filters
            .as_ref()
            .map(MetadataFilter::from_value)
            .transpose()
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ChunkwiseError::ConfigError(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. `CHUNKWISE_CONFIG` env var
    /// 2. XDG config file (~/.config/chunkwise/config.toml)
    /// 3. ./chunkwise.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("CHUNKWISE_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("chunkwise.toml").exists() {
                Self::from_file("chunkwise.toml")?
            } else {
                Self::default()
            }
        };

        // Collections live in the XDG data dir unless set explicitly
        if config.storage.persist_dir == default_persist_dir() {
            config.storage.persist_dir = xdg.default_persist_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Some(size) = parse_env("CHUNKWISE_CHUNK_SIZE") {
            self.chunking.chunk_size = size;
        }
        if let Some(overlap) = parse_env("CHUNKWISE_OVERLAP_SIZE") {
            self.chunking.overlap_size = overlap;
        }

        if let Ok(model) = env::var("CHUNKWISE_MODEL") {
            self.embedding.model = model;
        }
        if let Ok(url) = env::var("CHUNKWISE_OLLAMA_URL") {
            self.embedding.url = url;
        }

        if let Ok(collection) = env::var("CHUNKWISE_COLLECTION") {
            self.storage.collection = collection;
        }
        if let Ok(dir) = env::var("CHUNKWISE_PERSIST_DIR") {
            self.storage.persist_dir = PathBuf::from(dir);
        }

        if let Some(k) = parse_env("CHUNKWISE_K") {
            self.query.k = k;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        validate_window(self.chunking.chunk_size, self.chunking.overlap_size)?;

        match self.chunking.splitter {
            SplitterKind::Char => {
                CharSplitter::new(&self.chunking.separators)?;
            }
            SplitterKind::Tokenizer => {
                if self.chunking.tokenizer_path.is_none() {
                    return Err(ChunkwiseError::ConfigError(
                        "splitter = \"tokenizer\" requires chunking.tokenizer_path".to_string(),
                    ));
                }
            }
        }

        if self.reader.file_glob.trim().is_empty() {
            return Err(ChunkwiseError::ConfigError(
                "File glob must not be empty".to_string(),
            ));
        }
        if self.reader.max_file_size_mb == 0 {
            return Err(ChunkwiseError::ConfigError(
                "Max file size must be non-zero".to_string(),
            ));
        }

        if ![PROVIDER_OLLAMA, PROVIDER_HASHING].contains(&self.embedding.provider.as_str()) {
            return Err(ChunkwiseError::ConfigError(format!(
                "Unknown embedding provider '{}'",
                self.embedding.provider
            )));
        }
        if self.embedding.batch_size == 0 {
            return Err(ChunkwiseError::ConfigError(
                "Embedding batch size must be non-zero".to_string(),
            ));
        }
        if self.embedding.dimensions == 0 {
            return Err(ChunkwiseError::ConfigError(
                "Embedding dimensions must be non-zero".to_string(),
            ));
        }

        validate_collection_name(&self.storage.collection)?;

        if self.query.document_key.is_empty() {
            return Err(ChunkwiseError::ConfigError(
                "Query document_key must not be empty".to_string(),
            ));
        }
        self.query.metadata_filter()?;

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!(
            "  Chunking: size={} overlap={} splitter={:?}",
            self.chunking.chunk_size,
            self.chunking.overlap_size,
            self.chunking.splitter
        );
        tracing::info!("  Separators: {} patterns", self.chunking.separators.len());
        tracing::info!("  File glob: {}", self.reader.file_glob);
        tracing::info!("  Max file size: {} MB", self.reader.max_file_size_mb);
        tracing::info!(
            "  Embedding: provider={} model={} url={}",
            self.embedding.provider,
            self.embedding.model,
            self.embedding.url
        );
        tracing::info!("  Persist dir: {:?}", self.storage.persist_dir);
        tracing::info!("  Collection: {}", self.storage.collection);
        tracing::info!("  Query k: {}", self.query.k);
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid number", name, raw);
            None
        }
    }
}
