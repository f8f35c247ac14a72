//! Query command - retrieve chunks similar to a query

use crate::cli::commands::TargetArgs;
use crate::cli::output::{colors, preview, print_output, PREVIEW_CHARS};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::retrieval::MetadataFilter;
use crate::core::services::{QueryOptions, Services};
use crate::core::types::RankedHit;
use clap::Args;
use serde::Serialize;

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Query text
    pub text: String,

    /// Top-K chunks to retrieve and display
    #[arg(long, short = 'k')]
    pub k: Option<usize>,

    /// Include similarity scores in output
    #[arg(long)]
    pub include_scores: bool,

    /// Limit results per document
    #[arg(long)]
    pub limit_per_doc: Option<usize>,

    /// Metadata filter as a flat JSON object, e.g. '{"filename":"a.docx"}'
    #[arg(long)]
    pub filters: Option<String>,

    /// Drop hits scoring below this similarity
    #[arg(long)]
    pub min_score: Option<f32>,

    #[command(flatten)]
    pub target: TargetArgs,
}

impl QueryArgs {
    /// Build query options from config, overridden by the given flags
    pub fn options(&self, config: &Config) -> crate::core::error::Result<QueryOptions> {
        let mut options = QueryOptions::from_config(&config.query)?;
        if let Some(k) = self.k {
            options.k = k;
        }
        if self.limit_per_doc.is_some() {
            options.limit_per_doc = self.limit_per_doc;
        }
        if let Some(raw) = &self.filters {
            options.filter = Some(MetadataFilter::from_json_str(raw)?);
        }
        if self.min_score.is_some() {
            options.min_score = self.min_score;
        }
        Ok(options)
    }
}

/// One displayed result
#[derive(Debug, Serialize)]
pub struct QueryResultItem {
    pub rank: usize,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub chunk_index: String,
    pub char_start: String,
    pub char_end: String,
    pub content: String,
    pub metadata: crate::core::types::ChunkMetadata,
}

/// Query response
#[derive(Debug, Serialize)]
pub struct QueryResponseOutput {
    pub query: String,
    pub collection: String,
    pub retrieved: usize,
    pub total_results: usize,
    pub results: Vec<QueryResultItem>,
}

fn field_or_unknown(ranked: &RankedHit, key: &str) -> String {
    match ranked.hit.metadata.get(key) {
        Some(value) => value.to_string(),
        None => "?".to_string(),
    }
}

fn result_item(ranked: RankedHit, document_key: &str, include_scores: bool) -> QueryResultItem {
    let file = match ranked.hit.metadata.get(document_key) {
        Some(value) => value.to_string(),
        None => crate::core::retrieval::UNKNOWN_DOCUMENT.to_string(),
    };
    QueryResultItem {
        rank: ranked.rank,
        score: include_scores.then_some(ranked.hit.score),
        chunk_index: field_or_unknown(&ranked, "chunk_index"),
        char_start: field_or_unknown(&ranked, "char_start"),
        char_end: field_or_unknown(&ranked, "char_end"),
        file,
        content: ranked.hit.content,
        metadata: ranked.hit.metadata,
    }
}

/// Render one result header line in the human format
pub fn format_result_line(item: &QueryResultItem) -> String {
    let score = match item.score {
        Some(score) => format!("score={} | ", colors::score(&format!("{score:.3}"))),
        None => String::new(),
    };
    format!(
        "[{}] {}file={} | chunk={} | pos={}-{}",
        colors::rank(&item.rank.to_string()),
        score,
        colors::file_path(&item.file),
        item.chunk_index,
        item.char_start,
        item.char_end
    )
}

/// Execute the query command
pub async fn execute(
    args: QueryArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    args.target.apply(&mut config);
    let include_scores = args.include_scores || config.query.include_scores;
    let options = args.options(&config)?;
    let services = Services::new(config)?;

    let outcome = services.query(&args.text, &options).await?;

    let results: Vec<QueryResultItem> = outcome
        .hits
        .into_iter()
        .map(|hit| result_item(hit, &options.document_key, include_scores))
        .collect();

    let output = QueryResponseOutput {
        query: args.text.clone(),
        collection: outcome.collection,
        retrieved: outcome.retrieved,
        total_results: results.len(),
        results,
    };

    match format {
        OutputFormat::Human => {
            if output.results.is_empty() {
                println!(
                    "No results found for '{}' in '{}'",
                    colors::label(&args.text),
                    colors::collection(&output.collection)
                );
            }
            for item in &output.results {
                println!("{}", format_result_line(item));
                println!(
                    "     \"{}\"",
                    colors::dim(&preview(&item.content, PREVIEW_CHARS))
                );
            }
        }
        OutputFormat::Json => print_output(&output, format),
    }

    Ok(())
}
