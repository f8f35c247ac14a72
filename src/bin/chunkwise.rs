//! chunkwise CLI - document chunking and retrieval
//!
//! # Examples
//!
//! ```bash
//! # Ingest a directory of documents
//! chunkwise pipeline ./docs --rebuild --print-stats
//!
//! # Query the collection
//! chunkwise query "warranty terms" -k 5 --limit-per-doc 2 --include-scores
//!
//! # Show configuration
//! chunkwise show-config
//! ```

use chunkwise::cli::{run, Cli, LogFormat};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(verbose: bool, format: LogFormat, ansi: bool) {
    let default_filter = if verbose { "chunkwise=debug" } else { "chunkwise=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // stderr only: stdout carries command output
    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(ansi)
                    .compact(),
            )
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format, !cli.no_color);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
