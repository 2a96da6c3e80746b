//! Filters a JSON catalog file for one owner and prints the matching items.
//!
//! Usage: `cargo run --bin refine -- --catalog products.json --owner alice "fall jackets"`

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use refine::{CatalogFilter, CatalogItem, FileSessionStore, FilterConfig, FilterRequest};
use refine_llm::{LlmSettings, OpenAiCompatibleProvider};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "refine", about = "Narrow a product catalog with natural-language queries")]
struct Args {
    /// JSON array of catalog items.
    #[arg(long)]
    catalog: PathBuf,

    /// Session owner; each owner keeps its own query history.
    #[arg(long, default_value = "local")]
    owner: String,

    /// Directory holding per-owner session files.
    #[arg(long, default_value = ".refine")]
    store_dir: PathBuf,

    /// Discard the owner's history before filtering.
    #[arg(long)]
    reset: bool,

    /// Query to apply. Omit to clear the session and list the whole catalog.
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let raw = tokio::fs::read_to_string(&args.catalog)
        .await
        .map_err(|error| format!("failed to read {}: {error}", args.catalog.display()))?;
    let catalog: Vec<CatalogItem> = serde_json::from_str(&raw)
        .map_err(|error| format!("invalid catalog {}: {error}", args.catalog.display()))?;

    let provider = Arc::new(OpenAiCompatibleProvider::new(LlmSettings::from_env())?);
    let store = Arc::new(FileSessionStore::new(args.store_dir));
    let engine = CatalogFilter::new(provider, store, FilterConfig::from_env());

    let request = FilterRequest {
        query: args.query,
        reset: args.reset,
    };
    let response = engine.filter_catalog(&args.owner, &catalog, request).await;

    for warning in &response.warnings {
        eprintln!("warning: {warning}");
    }
    println!("{}", serde_json::to_string_pretty(&response.items)?);
    Ok(())
}
