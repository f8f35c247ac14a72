// Document reader tests: discovery, extraction and provenance

use crate::common::DocFolder;
use chunkwise::core::config::ReaderConfig;
use chunkwise::core::reader::{content_hash, DocumentReader};

fn reader(glob: &str) -> DocumentReader {
    let config = ReaderConfig {
        file_glob: glob.to_string(),
        ..ReaderConfig::default()
    };
    DocumentReader::new(&config).unwrap()
}

#[test]
fn test_reads_docx_and_rtf() {
    let folder = DocFolder::small();
    let docs = reader("**/*.{docx,rtf}").read_documents(folder.path()).unwrap();

    let names: Vec<&str> = docs.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, vec!["coop.rtf", "garden.docx", "solar.rtf"]);

    let garden = &docs[1];
    assert_eq!(
        garden.text,
        "Tomatoes need full sun and regular watering.\nMulch keeps the soil moist in summer."
    );
    assert_eq!(garden.doc_hash, content_hash(&garden.text));
    assert_eq!(garden.total_chars, garden.text.chars().count());

    let solar = &docs[2];
    assert!(solar.text.contains("Solar panels convert sunlight into electricity.\n"));
    assert!(!solar.text.contains("Calibri"));
}

#[test]
fn test_glob_narrows_to_one_type() {
    let folder = DocFolder::small();
    let docs = reader("**/*.docx").read_documents(folder.path()).unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].filename, "garden.docx");
}

#[test]
fn test_nested_directories_and_hidden_dirs() {
    let folder = DocFolder::new()
        .with_rtf("top.rtf", &["top"])
        .with_rtf("reports/2024/q1.rtf", &["nested"])
        .with_rtf(".cache/hidden.rtf", &["hidden"]);
    let docs = reader("**/*.{docx,rtf}").read_documents(folder.path()).unwrap();

    let names: Vec<&str> = docs.iter().map(|d| d.filename.as_str()).collect();
    assert!(names.contains(&"top.rtf"));
    assert!(names.contains(&"q1.rtf"));
    assert!(!names.contains(&"hidden.rtf"));
}

#[test]
fn test_uppercase_extension_accepted() {
    let folder = DocFolder::new().with_docx("MEMO.DOCX", &["Upper case extension"]);
    let docs = reader("**/*.{docx,rtf}").read_documents(folder.path()).unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].text, "Upper case extension");
}

#[test]
fn test_unsupported_and_broken_files_skipped() {
    let folder = DocFolder::small()
        .with_raw("notes.txt", b"plain text is not a supported type")
        .with_raw("broken.docx", b"PK but not really")
        .with_raw("broken.rtf", b"no header here");

    let outcome = reader("**/*").read_with_stats(folder.path()).unwrap();

    assert_eq!(outcome.documents.len(), 3);
    assert_eq!(outcome.skipped, 2);
}

#[test]
fn test_xml_entities_decoded() {
    let folder = DocFolder::new().with_docx("law.docx", &["Smith & Sons <Ltd>"]);
    let docs = reader("**/*.docx").read_documents(folder.path()).unwrap();

    assert_eq!(docs[0].text, "Smith & Sons <Ltd>");
}

#[test]
fn test_source_text_carries_provenance() {
    let folder = DocFolder::new().with_rtf("one.rtf", &["Only paragraph."]);
    let docs = reader("**/*.rtf").read_documents(folder.path()).unwrap();
    let source = docs[0].to_source_text();

    assert_eq!(source.metadata["filename"], "one.rtf");
    assert_eq!(source.metadata["doc_hash"], docs[0].doc_hash);
    assert!(std::path::Path::new(&source.metadata["source_path"]).is_absolute());
}
