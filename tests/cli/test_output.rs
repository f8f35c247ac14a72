//! Tests for CLI output formatting helpers

use chunkwise::cli::output::{format_duration, preview, PREVIEW_CHARS};

#[test]
fn test_format_duration_various_times() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(0.25), "250ms");
    assert_eq!(format_duration(1.0), "1.00s");
    assert_eq!(format_duration(59.5), "59.50s");
    assert_eq!(format_duration(60.0), "1m 0.0s");
    assert_eq!(format_duration(125.0), "2m 5.0s");
}

#[test]
fn test_preview_flattens_newlines() {
    assert_eq!(preview("a\nb\r\nc", 200), "a b  c");
}

#[test]
fn test_preview_keeps_short_text() {
    assert_eq!(preview("short", PREVIEW_CHARS), "short");
}

#[test]
fn test_preview_truncates_long_text() {
    let text = "x".repeat(500);
    assert_eq!(preview(&text, PREVIEW_CHARS).len(), 200);
}

#[test]
fn test_preview_multibyte_boundary() {
    let text = "🦀".repeat(250);
    let p = preview(&text, PREVIEW_CHARS);
    assert_eq!(p.chars().count(), 200);
    assert!(p.chars().all(|c| c == '🦀'));
}
