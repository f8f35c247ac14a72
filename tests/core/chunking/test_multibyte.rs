// UTF-8 safety tests: windows over emoji and multibyte text
//
// Offsets are character offsets, so every slice taken from them is
// valid and no window splits a code point.

use crate::common::Utf8TestData;
use chunkwise::core::chunking::{CharSplitter, Chunker};
use chunkwise::core::types::SourceText;

fn hard_cut(size: usize, overlap: usize) -> Chunker {
    Chunker::new(size, overlap, Box::new(CharSplitter::hard_cut())).unwrap()
}

#[test]
fn test_emoji_windows_respect_char_units() {
    let text = "Hello 👋 World 🌍 Rust 🦀 Done ✅".repeat(5);
    let records = hard_cut(7, 2).chunk(&[SourceText::new(text.clone())]).unwrap();

    assert!(records.len() > 1);
    for r in &records {
        assert!(r.content.chars().count() <= 7);
        assert_eq!(r.total_chars(), Some(text.chars().count()));
    }
    assert_eq!(records[0].content, "Hello 👋");
}

#[test]
fn test_multibyte_offsets_are_in_chars() {
    let text = "中文测试中文测试";
    let records = hard_cut(100, 10).chunk(&[SourceText::new(text)]).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].char_end(), Some(8));
    assert_eq!(records[0].total_chars(), Some(8));
}

#[test]
fn test_mixed_scripts_with_default_separators() {
    let data = Utf8TestData::new();
    let text = data.combined();
    let chunker = Chunker::new(20, 4, Box::new(CharSplitter::with_defaults())).unwrap();
    let records = chunker.chunk(&[SourceText::new(text.clone())]).unwrap();

    assert!(!records.is_empty());
    let mut rebuilt = records[0].content.clone();
    for r in &records[1..] {
        rebuilt.extend(r.content.chars().skip(4));
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn test_each_sample_chunks_without_panic() {
    let data = Utf8TestData::new();
    let chunker = hard_cut(3, 1);

    for sample in data.emoji.iter().chain(data.multibyte.iter()) {
        let records = chunker.chunk(&[SourceText::new(*sample)]).unwrap();
        assert!(!records.is_empty(), "no chunks for {sample:?}");
        assert_eq!(records[0].char_start(), Some(0));
    }
}
