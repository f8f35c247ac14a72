//! Pipeline command - parse, chunk, embed and store documents

use crate::cli::commands::TargetArgs;
use crate::cli::output::{colors, format_duration, print_output, print_warning};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::types::IngestStats;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the pipeline command
#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Directory to scan for documents (.docx, .rtf)
    pub input_dir: PathBuf,

    /// Units per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Units shared by consecutive chunks
    #[arg(long)]
    pub overlap_size: Option<usize>,

    /// Comma-separated separator regexes, highest priority first
    #[arg(long, value_delimiter = ',')]
    pub separators: Vec<String>,

    /// Glob filter under the input directory
    #[arg(long)]
    pub file_glob: Option<String>,

    /// Limit number of files to process
    #[arg(long)]
    pub max_files: Option<usize>,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Drop the existing collection before ingesting
    #[arg(long)]
    pub rebuild: bool,

    /// Print ingestion statistics
    #[arg(long)]
    pub print_stats: bool,
}

impl PipelineArgs {
    /// Override config values with the flags that were given
    pub fn apply(&self, config: &mut Config) {
        if let Some(size) = self.chunk_size {
            config.chunking.chunk_size = size;
        }
        if let Some(overlap) = self.overlap_size {
            config.chunking.overlap_size = overlap;
        }
        if !self.separators.is_empty() {
            config.chunking.separators = self.separators.clone();
        }
        if let Some(glob) = &self.file_glob {
            config.reader.file_glob = glob.clone();
        }
        if self.max_files.is_some() {
            config.reader.max_files = self.max_files;
        }
        self.target.apply(config);
    }
}

/// Pipeline result response
#[derive(Debug, Serialize)]
pub struct PipelineResponse {
    pub input_dir: String,
    pub collection: String,
    pub persist_dir: String,
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub chunks_created: usize,
    pub total_chars: usize,
    pub avg_chunk_chars: f64,
    pub duration_secs: f64,
}

impl PipelineResponse {
    fn new(input_dir: String, persist_dir: String, stats: IngestStats) -> Self {
        Self {
            input_dir,
            persist_dir,
            collection: stats.collection,
            files_indexed: stats.files_indexed,
            files_skipped: stats.files_skipped,
            chunks_created: stats.chunks_created,
            total_chars: stats.total_chars,
            avg_chunk_chars: stats.avg_chunk_chars,
            duration_secs: stats.duration_ms as f64 / 1000.0,
        }
    }
}

/// Execute the pipeline command
pub async fn execute(
    args: PipelineArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = args.input_dir.canonicalize().map_err(|e| {
        format!(
            "Invalid input directory '{}': {}. Make sure the path exists and is accessible.",
            args.input_dir.display(),
            e
        )
    })?;

    args.apply(&mut config);
    let services = Services::new(config)?;

    if format == OutputFormat::Human {
        eprintln!(
            "Ingesting {} into '{}'...",
            colors::file_path(&path.display().to_string()),
            colors::collection(&services.config.storage.collection)
        );
    }

    let stats = services.ingest(&path, args.rebuild).await?;
    if stats.files_indexed == 0 {
        print_warning("No documents found for ingestion.");
    }

    let response = PipelineResponse::new(
        path.to_string_lossy().into_owned(),
        services.config.storage.persist_dir.display().to_string(),
        stats,
    );

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} files ({} chunks) into '{}' in {}",
                colors::success("Ingested"),
                colors::number(&response.files_indexed.to_string()),
                colors::number(&response.chunks_created.to_string()),
                colors::collection(&response.collection),
                colors::number(&format_duration(response.duration_secs))
            );
            if response.files_skipped > 0 {
                print_warning(&format!(
                    "{} files could not be parsed (run with --verbose for details)",
                    response.files_skipped
                ));
            }
            if args.print_stats {
                println!(
                    "Stats: files={} chunks={} avg_chunk_len={:.1} total_chars={}",
                    response.files_indexed,
                    response.chunks_created,
                    response.avg_chunk_chars,
                    response.total_chars
                );
            }
        }
        OutputFormat::Json => print_output(&response, format),
    }

    Ok(())
}
