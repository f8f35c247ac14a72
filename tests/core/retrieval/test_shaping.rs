// Result shaper tests over ranked retrieval hits

use crate::common::hit;
use chunkwise::core::error::ChunkwiseError;
use chunkwise::core::retrieval::{HitOrdering, MetadataFilter, ResultShaper};
use chunkwise::core::types::{MetaValue, RetrievalHit};
use serde_json::json;

fn doc_hit(filename: &str, chunk_index: i64, score: f32) -> RetrievalHit {
    hit(
        &[
            ("filename", MetaValue::from(filename)),
            ("chunk_index", MetaValue::Int(chunk_index)),
        ],
        score,
    )
}

/// Ten hits, descending: six from a.docx then four from b.docx
fn six_a_then_four_b() -> Vec<RetrievalHit> {
    (0..10)
        .map(|i| {
            let name = if i < 6 { "a.docx" } else { "b.docx" };
            doc_hit(name, i, 1.0 - i as f32 * 0.05)
        })
        .collect()
}

fn indices(shaped: &[chunkwise::core::types::RankedHit]) -> Vec<String> {
    shaped.iter().map(|r| r.hit.meta_string("chunk_index")).collect()
}

#[test]
fn test_limit_per_doc_then_display_count() {
    let shaped = ResultShaper::new(4)
        .with_limit_per_doc(Some(2))
        .shape(six_a_then_four_b());

    assert_eq!(indices(&shaped), vec!["0", "1", "6", "7"]);
    let ranks: Vec<usize> = shaped.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[test]
fn test_ranks_are_dense_after_skips() {
    let filter = MetadataFilter::from_value(&json!({"filename": "b.docx"})).unwrap();
    let shaped = ResultShaper::new(10)
        .with_filter(Some(filter))
        .shape(six_a_then_four_b());

    assert_eq!(shaped.len(), 4);
    assert_eq!(shaped[0].rank, 1);
    assert_eq!(shaped[3].rank, 4);
    assert_eq!(shaped[0].hit.meta_string("chunk_index"), "6");
}

#[test]
fn test_filter_on_integer_metadata() {
    let filter = MetadataFilter::from_json_str(r#"{"chunk_index": 3}"#).unwrap();
    let shaped = ResultShaper::new(10)
        .with_filter(Some(filter))
        .shape(six_a_then_four_b());

    assert_eq!(shaped.len(), 1);
    assert_eq!(shaped[0].hit.meta_string("filename"), "a.docx");
}

#[test]
fn test_filter_missing_key_compares_as_empty() {
    let hits = vec![
        hit(&[("filename", MetaValue::from("a.docx"))], 0.9),
        hit(&[("filename", MetaValue::from("b.docx")), ("lang", MetaValue::from("en"))], 0.8),
    ];

    let wants_empty = MetadataFilter::from_json_str(r#"{"lang": ""}"#).unwrap();
    let shaped = ResultShaper::new(10).with_filter(Some(wants_empty)).shape(hits.clone());
    assert_eq!(shaped.len(), 1);
    assert_eq!(shaped[0].hit.meta_string("filename"), "a.docx");

    let wants_en = MetadataFilter::from_json_str(r#"{"lang": "en"}"#).unwrap();
    let shaped = ResultShaper::new(10).with_filter(Some(wants_en)).shape(hits);
    assert_eq!(shaped.len(), 1);
    assert_eq!(shaped[0].hit.meta_string("filename"), "b.docx");
}

#[test]
fn test_malformed_filters_rejected() {
    for raw in [
        "not json",
        "[1, 2]",
        r#""filename""#,
        r#"{"filename": {"$eq": "a.docx"}}"#,
        r#"{"filename": ["a.docx"]}"#,
        r#"{"filename": null}"#,
    ] {
        assert!(
            matches!(
                MetadataFilter::from_json_str(raw),
                Err(ChunkwiseError::InputError(_))
            ),
            "accepted {raw}"
        );
    }
}

#[test]
fn test_missing_document_key_grouped_as_unknown() {
    let hits = vec![
        hit(&[("chunk_index", MetaValue::Int(0))], 0.9),
        hit(&[("chunk_index", MetaValue::Int(1))], 0.8),
        doc_hit("a.docx", 2, 0.7),
    ];
    let shaped = ResultShaper::new(10).with_limit_per_doc(Some(1)).shape(hits);

    assert_eq!(indices(&shaped), vec!["0", "2"]);
}

#[test]
fn test_custom_document_key() {
    let hits: Vec<RetrievalHit> = (0..4)
        .map(|i| {
            hit(
                &[
                    ("source_path", MetaValue::from("/docs/same.docx")),
                    ("filename", MetaValue::from(format!("copy{i}.docx"))),
                    ("chunk_index", MetaValue::Int(i)),
                ],
                0.9,
            )
        })
        .collect();

    let by_filename = ResultShaper::new(10).with_limit_per_doc(Some(1)).shape(hits.clone());
    assert_eq!(by_filename.len(), 4);

    let by_path = ResultShaper::new(10)
        .with_limit_per_doc(Some(1))
        .with_document_key("source_path")
        .shape(hits);
    assert_eq!(by_path.len(), 1);
}

#[test]
fn test_zero_display_or_limit_is_empty() {
    assert!(ResultShaper::new(0).shape(six_a_then_four_b()).is_empty());
    assert!(ResultShaper::new(5)
        .with_limit_per_doc(Some(0))
        .shape(six_a_then_four_b())
        .is_empty());
    assert!(ResultShaper::new(5).shape(Vec::new()).is_empty());
}

#[test]
fn test_min_score_cutoff() {
    let shaped = ResultShaper::new(10)
        .with_min_score(Some(0.8))
        .shape(six_a_then_four_b());

    // Scores 1.0, 0.95, 0.9, 0.85, 0.8
    assert_eq!(shaped.len(), 5);
    assert!(shaped.iter().all(|r| r.hit.score >= 0.8));
}

#[test]
fn test_trusted_ordering_keeps_input_order() {
    let hits = vec![
        doc_hit("a.docx", 0, 0.1),
        doc_hit("b.docx", 1, 0.9),
        doc_hit("c.docx", 2, 0.5),
    ];

    let trusted = ResultShaper::new(10).shape(hits.clone());
    assert_eq!(indices(&trusted), vec!["0", "1", "2"]);

    let sorted = ResultShaper::new(10)
        .with_ordering(HitOrdering::Descending)
        .shape(hits);
    assert_eq!(indices(&sorted), vec!["1", "2", "0"]);
}

#[test]
fn test_descending_ordering_puts_nan_last() {
    let hits = vec![
        doc_hit("a.docx", 0, f32::NAN),
        doc_hit("b.docx", 1, 0.2),
        doc_hit("c.docx", 2, 0.7),
    ];
    let sorted = ResultShaper::new(10)
        .with_ordering(HitOrdering::Descending)
        .shape(hits);

    assert_eq!(indices(&sorted), vec!["2", "1", "0"]);
}
