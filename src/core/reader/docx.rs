//! `.docx` text extraction.
//!
//! A `.docx` file is a zip archive; the body text lives in
//! `word/document.xml` as WordprocessingML. Paragraph text is the
//! concatenation of its `<w:t>` runs, with `<w:tab/>` read as a tab
//! and `<w:br/>`/`<w:cr/>` as a line break. Empty paragraphs are
//! dropped and the rest joined with `\n`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::core::error::{ChunkwiseError, Result};
use crate::core::reader::DocumentParser;

const DOCUMENT_XML: &str = "word/document.xml";

// Elements that contribute to paragraph text, in document order
static BODY_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)<w:t(?:\s[^>]*)?>(?P<text>.*?)</w:t>|<w:tab\s*/>|<w:(?:br|cr)(?:\s[^>]*)?/>|</w:p>|<w:p(?:\s[^>]*)?/>",
    )
    .unwrap()
});

static XML_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|lt|gt|amp|apos|quot);")
        .unwrap()
});

/// Parser for Office Open XML word documents
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxParser;

impl DocxParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract paragraph text from `word/document.xml` content
    pub fn extract_paragraphs(xml: &str) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut current = String::new();

        for caps in BODY_TOKEN.captures_iter(xml) {
            if let Some(text) = caps.name("text") {
                current.push_str(&decode_entities(text.as_str()));
                continue;
            }

            let token = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            if token.starts_with("<w:tab") {
                current.push('\t');
            } else if token.starts_with("<w:br") || token.starts_with("<w:cr") {
                current.push('\n');
            } else if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        }

        if !current.is_empty() {
            paragraphs.push(current);
        }

        paragraphs
    }
}

impl DocumentParser for DocxParser {
    fn extensions(&self) -> &'static [&'static str] {
        &["docx"]
    }

    fn parse(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| ChunkwiseError::parse(path, format!("not a zip archive: {e}")))?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_XML)
            .map_err(|e| ChunkwiseError::parse(path, format!("missing {DOCUMENT_XML}: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| ChunkwiseError::parse(path, format!("unreadable {DOCUMENT_XML}: {e}")))?;

        Ok(Self::extract_paragraphs(&xml).join("\n"))
    }
}

/// Decode the predefined XML entities and character references
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    XML_ENTITY
        .replace_all(raw, |caps: &Captures| {
            let name = &caps[1];
            let decoded = match name {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "apos" => Some('\''),
                "quot" => Some('"'),
                _ if name.starts_with("#x") => u32::from_str_radix(&name[2..], 16)
                    .ok()
                    .and_then(char::from_u32),
                _ => name[1..].parse::<u32>().ok().and_then(char::from_u32),
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
