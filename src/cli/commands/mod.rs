//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod completions;
pub mod config;
pub mod pipeline;
pub mod query;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use pipeline::PipelineArgs;
pub use query::QueryArgs;

use crate::core::config::Config;
use clap::Args;
use std::path::PathBuf;

/// Storage and model flags shared by `pipeline` and `query`
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// Collection name (default from config: rag-docs)
    #[arg(long, short = 'c')]
    pub collection: Option<String>,

    /// Directory holding collections
    #[arg(long)]
    pub persist_dir: Option<PathBuf>,

    /// Embedding model name
    #[arg(long, short = 'm')]
    pub model: Option<String>,
}

impl TargetArgs {
    /// Override config values with the flags that were given
    pub fn apply(&self, config: &mut Config) {
        if let Some(collection) = &self.collection {
            config.storage.collection = collection.clone();
        }
        if let Some(dir) = &self.persist_dir {
            config.storage.persist_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            config.embedding.model = model.clone();
        }
    }
}
