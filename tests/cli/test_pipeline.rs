//! Tests for the pipeline command handler

use crate::common::{test_config, DocFolder};
use chunkwise::cli::commands::pipeline::{execute, PipelineArgs};
use chunkwise::cli::commands::TargetArgs;
use chunkwise::cli::OutputFormat;
use chunkwise::core::store::LanceCollection;
use tempfile::TempDir;

fn args(input: &std::path::Path) -> PipelineArgs {
    PipelineArgs {
        input_dir: input.to_path_buf(),
        chunk_size: None,
        overlap_size: None,
        separators: Vec::new(),
        file_glob: None,
        max_files: None,
        target: TargetArgs::default(),
        rebuild: false,
        print_stats: true,
    }
}

#[tokio::test]
async fn test_pipeline_creates_collection() {
    let folder = DocFolder::small();
    let store = TempDir::new().unwrap();

    execute(args(folder.path()), test_config(store.path()), OutputFormat::Json)
        .await
        .unwrap();

    assert!(LanceCollection::exists(store.path(), "rag-docs"));
}

#[tokio::test]
async fn test_pipeline_flag_overrides() {
    let folder = DocFolder::small();
    let store = TempDir::new().unwrap();

    let mut pipeline_args = args(folder.path());
    pipeline_args.chunk_size = Some(30);
    pipeline_args.overlap_size = Some(5);
    pipeline_args.file_glob = Some("**/*.docx".to_string());
    pipeline_args.target.collection = Some("gardening".to_string());

    execute(pipeline_args, test_config(store.path()), OutputFormat::Human)
        .await
        .unwrap();

    let collection = LanceCollection::open(store.path(), "gardening")
        .await
        .unwrap();
    assert!(collection.count().await.unwrap() >= 3);
    assert!(!LanceCollection::exists(store.path(), "rag-docs"));
}

#[tokio::test]
async fn test_pipeline_rejects_bad_window() {
    let folder = DocFolder::small();
    let store = TempDir::new().unwrap();

    let mut pipeline_args = args(folder.path());
    pipeline_args.chunk_size = Some(10);
    pipeline_args.overlap_size = Some(10);

    let result = execute(pipeline_args, test_config(store.path()), OutputFormat::Human).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Overlap size"));
    assert!(!LanceCollection::exists(store.path(), "rag-docs"));
}

#[tokio::test]
async fn test_pipeline_missing_input_dir() {
    let store = TempDir::new().unwrap();
    let missing = store.path().join("no-such-dir");

    let result = execute(args(&missing), test_config(store.path()), OutputFormat::Human).await;

    let message = result.unwrap_err().to_string();
    assert!(message.contains("Invalid input directory"));
}
