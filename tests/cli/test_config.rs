//! Tests for the show-config command handler

use chunkwise::cli::commands::config::{execute, ConfigArgs};
use chunkwise::cli::OutputFormat;
use chunkwise::core::config::Config;
use chunkwise::core::xdg::XdgDirs;
use std::path::PathBuf;

fn xdg(root: &std::path::Path) -> XdgDirs {
    XdgDirs {
        config_dir: root.join("config"),
        data_dir: root.join("data"),
    }
}

#[test]
fn test_show_config_all_formats() {
    let temp = tempfile::tempdir().unwrap();
    let dirs = xdg(temp.path());
    let config = Config::default();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        execute(ConfigArgs { toml: false }, &config, &dirs, format).unwrap();
    }
    execute(ConfigArgs { toml: true }, &config, &dirs, OutputFormat::Human).unwrap();
}

#[test]
fn test_printed_toml_loads_back() {
    let mut config = Config::default();
    config.storage.persist_dir = PathBuf::from("/srv/chunkwise");
    config.query.limit_per_doc = Some(2);

    let text = toml::to_string_pretty(&config).unwrap();
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, text).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.storage.persist_dir, PathBuf::from("/srv/chunkwise"));
    assert_eq!(loaded.query.limit_per_doc, Some(2));
    assert!(loaded.validate().is_ok());
}
