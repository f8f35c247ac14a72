// End-to-end tests: ingest a folder, then query the collection

use crate::common::{assert_valid_stats, create_test_services, test_config, DocFolder};
use chunkwise::core::error::ChunkwiseError;
use chunkwise::core::retrieval::MetadataFilter;
use chunkwise::core::services::{QueryOptions, Services};
use chunkwise::core::store::{LanceCollection, VectorStore};
use tempfile::TempDir;

fn options(services: &Services) -> QueryOptions {
    QueryOptions::from_config(&services.config.query).unwrap()
}

#[tokio::test]
async fn test_ingest_small_folder() {
    let folder = DocFolder::small();
    let services = create_test_services();

    let stats = services.ingest(folder.path(), false).await.unwrap();

    assert_valid_stats(&stats);
    assert_eq!(stats.files_indexed, 3);
    assert_eq!(stats.files_skipped, 0);
    assert_eq!(stats.collection, "rag-docs");

    let collection = services.open_collection().await.unwrap();
    assert_eq!(collection.count().await.unwrap(), stats.chunks_created);
    assert_eq!(collection.metadata().dimensions, Some(256));
    assert_eq!(collection.metadata().model.as_deref(), Some("hashing-xxh64"));
}

#[tokio::test]
async fn test_query_ranks_relevant_document_first() {
    let folder = DocFolder::small();
    let services = create_test_services();
    services.ingest(folder.path(), false).await.unwrap();

    let outcome = services
        .query("tomatoes watering soil", &options(&services))
        .await
        .unwrap();

    assert!(!outcome.hits.is_empty());
    assert_eq!(outcome.hits[0].hit.meta_string("filename"), "garden.docx");
    let ranks: Vec<usize> = outcome.hits.iter().map(|h| h.rank).collect();
    let expected: Vec<usize> = (1..=outcome.hits.len()).collect();
    assert_eq!(ranks, expected);

    // Stored positions survive the round trip through the collection
    let top = &outcome.hits[0].hit;
    assert!(top.metadata.contains_key("char_start"));
    assert!(top.metadata.contains_key("ingested_at"));
}

#[tokio::test]
async fn test_query_with_filter_and_limit() {
    let folder = DocFolder::small();
    let services = create_test_services();
    services.ingest(folder.path(), false).await.unwrap();

    let mut opts = options(&services);
    opts.filter = Some(MetadataFilter::from_json_str(r#"{"filename": "coop.rtf"}"#).unwrap());
    opts.limit_per_doc = Some(1);

    let outcome = services.query("winter bedding", &opts).await.unwrap();

    assert_eq!(outcome.hits.len(), 1);
    assert_eq!(outcome.hits[0].hit.meta_string("filename"), "coop.rtf");
    assert!(outcome.retrieved >= outcome.hits.len());
}

#[tokio::test]
async fn test_reingest_is_idempotent() {
    let folder = DocFolder::small();
    let services = create_test_services();

    let first = services.ingest(folder.path(), false).await.unwrap();
    let second = services.ingest(folder.path(), false).await.unwrap();

    assert_eq!(first.chunks_created, second.chunks_created);
    let collection = services.open_collection().await.unwrap();
    assert_eq!(collection.count().await.unwrap(), first.chunks_created);
}

#[tokio::test]
async fn test_rebuild_drops_previous_documents() {
    let store = TempDir::new().unwrap();
    let services = Services::new(test_config(store.path())).unwrap();

    let before = DocFolder::small();
    services.ingest(before.path(), false).await.unwrap();

    let after = DocFolder::new().with_rtf("only.rtf", &["A single short document."]);
    let stats = services.ingest(after.path(), true).await.unwrap();

    let collection = services.open_collection().await.unwrap();
    assert_eq!(collection.count().await.unwrap(), stats.chunks_created);
    assert_eq!(stats.chunks_created, 1);
}

#[tokio::test]
async fn test_collections_are_isolated() {
    let store = TempDir::new().unwrap();
    let mut config_a = test_config(store.path());
    config_a.storage.collection = "alpha".to_string();
    let mut config_b = test_config(store.path());
    config_b.storage.collection = "beta".to_string();

    let services_a = Services::new(config_a).unwrap();
    let services_b = Services::new(config_b).unwrap();

    services_a.ingest(DocFolder::small().path(), false).await.unwrap();

    assert!(LanceCollection::exists(store.path(), "alpha"));
    assert!(!LanceCollection::exists(store.path(), "beta"));

    let result = services_b.query("solar", &options(&services_b)).await;
    assert!(matches!(result, Err(ChunkwiseError::InvalidCollection(_))));
}

#[tokio::test]
async fn test_delete_collection() {
    let folder = DocFolder::small();
    let services = create_test_services();
    services.ingest(folder.path(), false).await.unwrap();

    let mut collection = services.open_collection().await.unwrap();
    assert!(collection.delete_collection("rag-docs").await.unwrap());
    assert_eq!(collection.count().await.unwrap(), 0);
    assert!(!collection.delete_collection("rag-docs").await.unwrap());
}

#[tokio::test]
async fn test_ingest_missing_directory() {
    let services = create_test_services();
    let result = services
        .ingest(std::path::Path::new("/nonexistent/docs"), false)
        .await;

    assert!(matches!(result, Err(ChunkwiseError::InvalidPath(_))));
}
