//! Document discovery and text extraction.
//!
//! Walks an input directory, parses every supported document and
//! returns its plain text with provenance (path, file name, content
//! hash). Documents that fail to parse are logged and skipped.

pub mod docx;
pub mod rtf;
pub mod walker;

pub use docx::DocxParser;
pub use rtf::RtfParser;
pub use walker::{expand_braces, DocumentWalker};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::core::config::ReaderConfig;
use crate::core::error::{ChunkwiseError, Result};
use crate::core::types::SourceText;

/// Extracts plain text from one kind of document
pub trait DocumentParser: Send + Sync {
    /// Lowercase extensions (without dot) handled by this parser
    fn extensions(&self) -> &'static [&'static str];

    /// Parse the file at `path` into plain text.
    ///
    /// Failures specific to the document are `ParseError`.
    fn parse(&self, path: &Path) -> Result<String>;
}

/// A parsed document with provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Absolute path of the source file
    pub source_path: String,

    /// File name component of the path
    pub filename: String,

    /// Extracted plain text
    pub text: String,

    /// Length of `text` in characters
    pub total_chars: usize,

    /// SHA-256 of `text`, lowercase hex
    pub doc_hash: String,
}

impl ParsedDocument {
    /// Build a document from extracted text, computing the hash
    pub fn new(path: &Path, text: String) -> Self {
        let source_path = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
            .to_string();
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            source_path,
            filename,
            total_chars: text.chars().count(),
            doc_hash: content_hash(&text),
            text,
        }
    }

    /// Convert to windowing-engine input with provenance metadata
    pub fn to_source_text(&self) -> SourceText {
        SourceText::new(self.text.clone())
            .with_meta("source_path", self.source_path.clone())
            .with_meta("filename", self.filename.clone())
            .with_meta("doc_hash", self.doc_hash.clone())
    }
}

/// SHA-256 hex digest of a text
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Documents read from a directory, plus the count of failures
#[derive(Debug, Default)]
pub struct ReadOutcome {
    pub documents: Vec<ParsedDocument>,
    pub skipped: usize,
}

/// Walks a directory and parses supported documents
pub struct DocumentReader {
    walker: DocumentWalker,
    parsers: Vec<Box<dyn DocumentParser>>,
    max_files: Option<usize>,
}

impl DocumentReader {
    /// Reader with the built-in `.docx` and `.rtf` parsers
    pub fn new(config: &ReaderConfig) -> Result<Self> {
        let parsers: Vec<Box<dyn DocumentParser>> =
            vec![Box::new(DocxParser::new()), Box::new(RtfParser::new())];
        Self::with_parsers(config, parsers)
    }

    /// Reader with a custom parser set
    pub fn with_parsers(
        config: &ReaderConfig,
        parsers: Vec<Box<dyn DocumentParser>>,
    ) -> Result<Self> {
        let extensions: Vec<&str> = parsers
            .iter()
            .flat_map(|p| p.extensions().iter().copied())
            .collect();
        let walker =
            DocumentWalker::new(&config.file_glob, &extensions, config.max_file_size_mb)?;

        Ok(Self {
            walker,
            parsers,
            max_files: config.max_files,
        })
    }

    /// Supported extensions across all parsers
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        self.parsers
            .iter()
            .flat_map(|p| p.extensions().iter().copied())
            .collect()
    }

    /// Parse every matching document under `root`.
    pub fn read_documents(&self, root: &Path) -> Result<Vec<ParsedDocument>> {
        Ok(self.read_with_stats(root)?.documents)
    }

    /// Like [`read_documents`](Self::read_documents), also reporting
    /// how many files were skipped.
    pub fn read_with_stats(&self, root: &Path) -> Result<ReadOutcome> {
        let mut files = self.walker.collect_files(root)?;
        if let Some(max) = self.max_files {
            files.truncate(max);
        }

        let mut outcome = ReadOutcome::default();
        for (idx, path) in files.iter().enumerate() {
            if idx % 100 == 0 && idx > 0 {
                tracing::info!("Progress: {}/{} files parsed", idx, files.len());
            }

            match self.parse_file(path) {
                Ok(doc) => {
                    tracing::info!("Parsed file: {:?} (chars={})", path, doc.total_chars);
                    outcome.documents.push(doc);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {:?}: {}", path, e);
                    outcome.skipped += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Parse a single file with the parser registered for its extension
    pub fn parse_file(&self, path: &Path) -> Result<ParsedDocument> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let parser = self
            .parsers
            .iter()
            .find(|p| p.extensions().contains(&ext.as_str()))
            .ok_or_else(|| ChunkwiseError::parse(path, format!("unsupported extension '{ext}'")))?;

        let text = parser.parse(path)?;
        Ok(ParsedDocument::new(path, text))
    }
}
