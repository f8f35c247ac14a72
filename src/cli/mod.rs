//! CLI adapter for chunkwise
//!
//! Provides the command-line interface for ingesting documents and
//! querying the resulting collection. Depends on `core/`; nothing in
//! `core/` depends on this module.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// chunkwise - document chunking and retrieval
///
/// Split .docx and .rtf documents into overlapping, position-tracked
/// chunks, embed them into a local collection and query it.
#[derive(Parser, Debug)]
#[command(name = "chunkwise")]
#[command(version)]
#[command(about = "Document chunking and retrieval shaping", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable ANSI colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log line format on stderr
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact single-line text
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse, chunk, embed and store documents from a directory
    Pipeline(commands::PipelineArgs),

    /// Retrieve the chunks most similar to a query
    Query(commands::QueryArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  chunkwise completions bash > ~/.local/share/bash-completion/completions/chunkwise
    ///   zsh:   chunkwise completions zsh > ~/.zfunc/_chunkwise
    ///   fish:  chunkwise completions fish > ~/.config/fish/completions/chunkwise.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::xdg::XdgDirs;

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Handle completions command early (doesn't need config)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.log_paths();

    // Load configuration; commands apply their flags on top
    let config = Config::load()?;

    match cli.command {
        Commands::Pipeline(args) => commands::pipeline::execute(args, config, cli.format).await,
        Commands::Query(args) => commands::query::execute(args, config, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &config, &xdg, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
