//! Show-config command - print the effective configuration

use crate::cli::output::{print_header, print_output};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the configuration as TOML (ready to save as config.toml)
    #[arg(long)]
    pub toml: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub config_file: String,
    pub config_file_exists: bool,
    #[serde(flatten)]
    pub config: &'a Config,
}

/// Execute the show-config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.toml {
        print!("{}", toml::to_string_pretty(config)?);
        return Ok(());
    }

    let config_file = xdg.config_file();
    let response = ConfigResponse {
        config_file: config_file.display().to_string(),
        config_file_exists: config_file.exists(),
        config,
    };

    match format {
        OutputFormat::Human => {
            print_header("Configuration:");
            println!(
                "  config_file: {}{}",
                response.config_file,
                if response.config_file_exists { "" } else { " (not found, using defaults)" }
            );
            println!("  chunking:");
            println!("    chunk_size: {}", config.chunking.chunk_size);
            println!("    overlap_size: {}", config.chunking.overlap_size);
            println!("    separators: {:?}", config.chunking.separators);
            println!("    splitter: {:?}", config.chunking.splitter);
            if let Some(path) = &config.chunking.tokenizer_path {
                println!("    tokenizer_path: {}", path.display());
            }
            println!("  reader:");
            println!("    file_glob: {}", config.reader.file_glob);
            if let Some(max) = config.reader.max_files {
                println!("    max_files: {max}");
            }
            println!("    max_file_size_mb: {}", config.reader.max_file_size_mb);
            println!("  embedding:");
            println!("    provider: {}", config.embedding.provider);
            println!("    model: {}", config.embedding.model);
            println!("    url: {}", config.embedding.url);
            println!("    batch_size: {}", config.embedding.batch_size);
            println!("  storage:");
            println!("    persist_dir: {}", config.storage.persist_dir.display());
            println!("    collection: {}", config.storage.collection);
            println!("  query:");
            println!("    k: {}", config.query.k);
            println!("    include_scores: {}", config.query.include_scores);
            if let Some(limit) = config.query.limit_per_doc {
                println!("    limit_per_doc: {limit}");
            }
            if let Some(min) = config.query.min_score {
                println!("    min_score: {min}");
            }
            println!("    document_key: {}", config.query.document_key);
            if let Some(filters) = &config.query.filters {
                println!("    filters: {filters}");
            }
        }
        OutputFormat::Json => print_output(&response, format),
    }

    Ok(())
}
