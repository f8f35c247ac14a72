// Windowing engine tests: positions, indices and reserved metadata

use chunkwise::core::chunking::{CharSplitter, Chunker, TextSplitter, RESERVED_KEYS};
use chunkwise::core::config::ChunkingConfig;
use chunkwise::core::error::{ChunkwiseError, Result};
use chunkwise::core::types::{ChunkRecord, MetaValue, SourceText};

fn default_chunker(size: usize, overlap: usize) -> Chunker {
    Chunker::new(size, overlap, Box::new(CharSplitter::with_defaults())).unwrap()
}

fn slice_chars(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end - start).collect()
}

fn long_text() -> String {
    (0..40)
        .map(|i| format!("Sentence number {i} talks about topic {}.", i % 7))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rebuild the source from overlapping pieces
fn reassemble(records: &[ChunkRecord], overlap: usize) -> String {
    let mut out = String::new();
    for (i, r) in records.iter().enumerate() {
        if i == 0 {
            out.push_str(&r.content);
        } else {
            out.extend(r.content.chars().skip(overlap));
        }
    }
    out
}

#[test]
fn test_exact_records_match_source_slice() {
    let text = long_text();
    let chunker = default_chunker(120, 20);
    let records = chunker.chunk(&[SourceText::new(text.clone())]).unwrap();

    assert!(records.len() > 1);
    assert!(records[0].exact_position);
    for r in records.iter().filter(|r| r.exact_position) {
        let (start, end) = (r.char_start().unwrap(), r.char_end().unwrap());
        assert_eq!(slice_chars(&text, start, end), r.content);
    }
}

#[test]
fn test_every_record_spans_its_content_length() {
    let text = long_text();
    let records = default_chunker(100, 30)
        .chunk(&[SourceText::new(text.clone())])
        .unwrap();

    for r in &records {
        let span = r.char_end().unwrap() - r.char_start().unwrap();
        assert_eq!(span, r.content.chars().count());
        assert!(r.content.chars().count() <= 100);
        assert_eq!(r.total_chars(), Some(text.chars().count()));
    }
}

#[test]
fn test_overlapping_pieces_reassemble_source() {
    let text = long_text();
    let records = default_chunker(90, 15)
        .chunk(&[SourceText::new(text.clone())])
        .unwrap();

    assert_eq!(reassemble(&records, 15), text);
}

#[test]
fn test_chunk_indices_contiguous_per_source() {
    let chunker = default_chunker(50, 10);
    let sources = vec![
        SourceText::new(long_text()).with_meta("filename", "a.docx"),
        SourceText::new("Short text.").with_meta("filename", "b.docx"),
        SourceText::new(long_text()).with_meta("filename", "c.docx"),
    ];
    let records = chunker.chunk(&sources).unwrap();

    for name in ["a.docx", "b.docx", "c.docx"] {
        let indices: Vec<usize> = records
            .iter()
            .filter(|r| r.meta_str("filename") == Some(name))
            .map(|r| r.chunk_index().unwrap())
            .collect();
        let expected: Vec<usize> = (0..indices.len()).collect();
        assert_eq!(indices, expected, "indices for {name}");
    }

    // Grouped by source, in input order
    let order: Vec<&str> = records.iter().filter_map(|r| r.meta_str("filename")).collect();
    let first_b = order.iter().position(|n| *n == "b.docx").unwrap();
    let first_c = order.iter().position(|n| *n == "c.docx").unwrap();
    assert!(order[..first_b].iter().all(|n| *n == "a.docx"));
    assert!(order[first_b..first_c].iter().all(|n| *n == "b.docx"));
}

#[test]
fn test_short_text_is_single_whole_chunk() {
    let records = default_chunker(512, 128)
        .chunk(&[SourceText::new("A tiny document.")])
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "A tiny document.");
    assert_eq!(records[0].char_start(), Some(0));
    assert_eq!(records[0].char_end(), Some(16));
}

#[test]
fn test_empty_inputs() {
    let chunker = default_chunker(10, 2);
    assert!(chunker.chunk(&[]).unwrap().is_empty());
    assert!(chunker.chunk(&[SourceText::new("")]).unwrap().is_empty());
}

#[test]
fn test_reserved_keys_cannot_be_shadowed() {
    let source = SourceText::new("Some text that will be chunked.")
        .with_meta("chunk_index", "tampered")
        .with_meta("char_start", "-1")
        .with_meta("ingested_at", "yesterday")
        .with_meta("filename", "a.docx");
    let records = default_chunker(512, 10).chunk(&[source]).unwrap();

    let meta = &records[0].metadata;
    assert_eq!(meta.get("chunk_index"), Some(&MetaValue::Int(0)));
    assert_eq!(meta.get("char_start"), Some(&MetaValue::Int(0)));
    assert_ne!(meta.get("ingested_at"), Some(&MetaValue::from("yesterday")));
    assert_eq!(records[0].meta_str("filename"), Some("a.docx"));
    for key in RESERVED_KEYS {
        assert!(meta.contains_key(key), "missing reserved key {key}");
    }
}

#[test]
fn test_ingested_at_is_utc_rfc3339() {
    let records = default_chunker(512, 10)
        .chunk(&[SourceText::new("text")])
        .unwrap();
    let ts = records[0].meta_str("ingested_at").unwrap();

    assert!(ts.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
}

#[test]
fn test_invalid_window_fails_before_processing() {
    for (size, overlap) in [(100, 100), (100, 150), (100, 0), (0, 0)] {
        let result = Chunker::new(size, overlap, Box::new(CharSplitter::with_defaults()));
        assert!(
            matches!(result, Err(ChunkwiseError::ConfigError(_))),
            "size={size} overlap={overlap}"
        );
    }

    let config = ChunkingConfig {
        chunk_size: 64,
        overlap_size: 64,
        ..ChunkingConfig::default()
    };
    assert!(Chunker::from_config(&config).is_err());
}

/// Uppercases its output, so no piece occurs literally in the source
struct ShoutingSplitter;

impl TextSplitter for ShoutingSplitter {
    fn name(&self) -> &'static str {
        "shouting"
    }

    fn count(&self, text: &str) -> Result<usize> {
        Ok(text.chars().count())
    }

    fn split(&self, text: &str, max_units: usize, _overlap: usize) -> Result<Vec<String>> {
        let chars: Vec<char> = text.chars().collect();
        Ok(chars
            .chunks(max_units)
            .map(|c| c.iter().collect::<String>().to_uppercase())
            .collect())
    }
}

#[test]
fn test_fallback_positions_are_flagged_and_deterministic() {
    let chunker = Chunker::new(5, 1, Box::new(ShoutingSplitter)).unwrap();
    let source = SourceText::new("abcdefghijkl");

    let first = chunker.chunk(&[source.clone()]).unwrap();
    let second = chunker.chunk(&[source]).unwrap();

    let spans: Vec<(usize, usize)> = first
        .iter()
        .map(|r| (r.char_start().unwrap(), r.char_end().unwrap()))
        .collect();
    assert_eq!(spans, vec![(0, 5), (5, 10), (10, 12)]);
    assert!(first.iter().all(|r| !r.exact_position));

    let again: Vec<(usize, usize)> = second
        .iter()
        .map(|r| (r.char_start().unwrap(), r.char_end().unwrap()))
        .collect();
    assert_eq!(spans, again);
}
