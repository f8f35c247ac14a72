//! Tests for the query command handler

use crate::common::{test_config, DocFolder};
use chunkwise::cli::commands::query::{execute, QueryArgs};
use chunkwise::cli::commands::TargetArgs;
use chunkwise::cli::OutputFormat;
use chunkwise::core::services::Services;
use tempfile::TempDir;

fn query_args(text: &str) -> QueryArgs {
    QueryArgs {
        text: text.to_string(),
        k: None,
        include_scores: true,
        limit_per_doc: None,
        filters: None,
        min_score: None,
        target: TargetArgs::default(),
    }
}

async fn ingested_store() -> TempDir {
    let store = TempDir::new().unwrap();
    let services = Services::new(test_config(store.path())).unwrap();
    services
        .ingest(DocFolder::small().path(), false)
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_query_human_and_json() {
    let store = ingested_store().await;

    for format in [OutputFormat::Human, OutputFormat::Json] {
        execute(query_args("solar electricity"), test_config(store.path()), format)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_query_with_filters_and_limit() {
    let store = ingested_store().await;

    let mut args = query_args("bedding");
    args.filters = Some(r#"{"filename": "coop.rtf"}"#.to_string());
    args.limit_per_doc = Some(1);
    args.k = Some(3);

    execute(args, test_config(store.path()), OutputFormat::Json)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_query_invalid_filter_json() {
    let store = ingested_store().await;

    let mut args = query_args("anything");
    args.filters = Some("{not json".to_string());

    let result = execute(args, test_config(store.path()), OutputFormat::Human).await;
    assert!(result.unwrap_err().to_string().contains("Invalid input"));
}

#[tokio::test]
async fn test_query_unknown_collection() {
    let store = ingested_store().await;

    let mut args = query_args("anything");
    args.target.collection = Some("missing".to_string());

    let result = execute(args, test_config(store.path()), OutputFormat::Human).await;
    assert!(result.unwrap_err().to_string().contains("not found"));
}
