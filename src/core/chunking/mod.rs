//! Chunking: splitters, the windowing engine and chunk metadata.

pub mod chunker;
pub mod metadata;
pub mod splitter;
pub mod tokenizer;

pub use chunker::Chunker;
pub use metadata::{synthesize, ChunkPosition, RESERVED_KEYS};
pub use splitter::{default_separators, validate_window, CharSplitter, TextSplitter};
pub use tokenizer::TokenizerSplitter;
