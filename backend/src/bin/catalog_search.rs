//! Search the book catalog from the command line.

use std::env;
use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use readlist::domain::ports::{CatalogSearch, CatalogVolume};
use readlist::outbound::catalog::{DEFAULT_GOOGLE_BOOKS_BASE_URL, GoogleBooksCatalog};
use tokio::runtime::Builder;
use url::Url;

const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// `catalog-search` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "catalog-search",
    about = "Search Google Books and print the matching volumes",
    version
)]
struct CliArgs {
    /// Search terms.
    #[arg(required = true, value_name = "query")]
    query: Vec<String>,
    /// API key. Falls back to `READLIST_GOOGLE_BOOKS_API_KEY`.
    #[arg(long = "api-key", value_name = "key")]
    api_key: Option<String>,
    /// Catalog endpoint.
    #[arg(long = "base-url", value_name = "url", default_value = DEFAULT_GOOGLE_BOOKS_BASE_URL)]
    base_url: Url,
    /// Request timeout in seconds.
    #[arg(long = "timeout", value_name = "seconds", default_value_t = 10)]
    timeout_seconds: u64,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let api_key = args
        .api_key
        .or_else(|| env::var("READLIST_GOOGLE_BOOKS_API_KEY").ok())
        .unwrap_or_default();
    let catalog = GoogleBooksCatalog::new(
        args.base_url,
        api_key,
        Duration::from_secs(args.timeout_seconds),
    )
    .map_err(|error| io::Error::other(format!("create catalog client: {error}")))?;

    let volumes = catalog
        .search(&args.query.join(" "))
        .await
        .map_err(|error| io::Error::other(format!("search failed: {error}")))?;

    let mut out = io::stdout().lock();
    writeln!(out, "Found {} books:", volumes.len())?;
    writeln!(out)?;
    for volume in &volumes {
        render_volume(&mut out, volume)?;
    }
    Ok(())
}

fn render_volume(out: &mut impl Write, volume: &CatalogVolume) -> io::Result<()> {
    writeln!(out, "Title: {}", volume.title)?;
    writeln!(out, "Authors: {}", volume.authors.join(", "))?;
    writeln!(out, "Categories: {}", volume.categories.join(", "))?;
    if let Some(description) = volume.description.as_deref() {
        writeln!(out, "Description: {}", preview(description))?;
    }
    if let Some(image_ref) = volume.image_ref.as_deref() {
        writeln!(out, "Thumbnail: {image_ref}")?;
    }
    writeln!(out, "---")
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(DESCRIPTION_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
