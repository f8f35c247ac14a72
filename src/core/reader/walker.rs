//! Directory walker for document discovery.
//!
//! Traverses a directory tree and keeps files matching a glob with
//! a supported document extension. Brace groups in the glob
//! (`**/*.{docx,rtf}`) are expanded into one pattern per
//! alternative. Walk errors (permission denied, etc.) are logged and
//! skipped.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{ChunkwiseError, Result};

/// Walks a directory and returns candidate documents
pub struct DocumentWalker {
    /// Expanded include patterns
    patterns: Vec<Pattern>,

    /// Extensions accepted after pattern matching (lowercase, no dot)
    extensions: Vec<String>,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

impl DocumentWalker {
    /// Create a walker
    ///
    /// # Arguments
    ///
    /// * `file_glob` - Glob for files to include, brace groups allowed
    /// * `extensions` - Accepted extensions, e.g. `["docx", "rtf"]`
    /// * `max_file_size_mb` - Maximum file size in megabytes
    pub fn new(file_glob: &str, extensions: &[&str], max_file_size_mb: usize) -> Result<Self> {
        let patterns = expand_braces(file_glob)
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|e| {
                    ChunkwiseError::ConfigError(format!("Invalid file glob '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    /// Number of patterns after brace expansion
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Collect matching files under `root`, sorted and de-duplicated.
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(ChunkwiseError::InvalidPath(format!(
                "Input directory does not exist or is not a directory: {}",
                root.display()
            )));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| should_process_entry(e, root))
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();

                    if let Ok(metadata) = entry.metadata() {
                        if metadata.len() > self.max_file_size_bytes {
                            tracing::debug!(
                                "Skipping large file: {:?} ({} bytes)",
                                path,
                                metadata.len()
                            );
                            continue;
                        }
                    }

                    if self.is_supported(path) && self.matches_patterns(path, root) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                }
            }
        }

        files.sort();
        files.dedup();

        tracing::info!(
            "Discovered {} candidate files in {:?} with {} pattern(s)",
            files.len(),
            root,
            self.patterns.len()
        );

        Ok(files)
    }

    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|s| s.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    /// Match the path relative to `root`, or just the file name
    fn matches_patterns(&self, path: &Path, root: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let file_name = path.file_name().and_then(|f| f.to_str());

        self.patterns.iter().any(|p| {
            p.matches_path_with(relative, MATCH_OPTIONS)
                || file_name
                    .map(|f| p.matches_with(f, MATCH_OPTIONS))
                    .unwrap_or(false)
        })
    }
}

/// Skip hidden directories, never the root itself
fn should_process_entry(entry: &DirEntry, root: &Path) -> bool {
    let path = entry.path();

    if path == root {
        return true;
    }

    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if name.starts_with('.') && entry.file_type().is_dir() {
            return false;
        }
    }

    true
}

/// Expand the brace groups of a glob, `a.{x,y}` -> `a.x`, `a.y`.
///
/// Nested groups are not supported; a group without a closing brace
/// is kept literally. Leading dots on alternatives are dropped when
/// the prefix already ends with one, so `*.{.docx}` reads as `*.docx`.
pub fn expand_braces(glob: &str) -> Vec<String> {
    let (open, close) = match (glob.find('{'), glob.find('}')) {
        (Some(o), Some(c)) if o < c => (o, c),
        _ => return vec![glob.to_string()],
    };

    let prefix = &glob[..open];
    let suffix = &glob[close + 1..];

    glob[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .flat_map(|alt| {
            let alt = if prefix.ends_with('.') {
                alt.trim_start_matches('.')
            } else {
                alt
            };
            expand_braces(&format!("{prefix}{alt}{suffix}"))
        })
        .collect()
}
