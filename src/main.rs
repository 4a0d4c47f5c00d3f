// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Work out the target URL and the query
// 3. Run the snapshot search (and the side probes) concurrently
// 4. Print and save the results
// 5. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod archive;   // src/archive/ - CDX queries, snapshot parsing, fetching
mod cli;       // src/cli.rs - command-line parsing
mod error;     // src/error.rs - typed errors
mod output;    // src/output.rs - files on disk
mod recon;     // src/recon/ - DNS, WHOIS, timemap, robots/sitemap probes
mod search;    // src/search/ - query, matcher, result store, dispatcher

use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use archive::{Endpoints, PageFetcher};
use cli::Cli;
use error::ArchiveError;
use output::Output;
use search::{Query, SearchRequest};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let start = Instant::now();

    let target = match &cli.url {
        Some(url) => url.clone(),
        None => read_url_from_stdin()?,
    };
    validate_url(&target)?;

    let query = Query::from_inputs(cli.regex.as_deref(), cli.terms.as_deref(), cli.term.as_deref())?;
    if query.is_none() {
        info!("No query submitted. Checking for snapshots...");
    }

    let endpoints = Endpoints::default();
    let output = Output::new(&cli.out);
    let fetcher = Arc::new(PageFetcher::new(cli.request_timeout())?);

    let request = SearchRequest {
        target: target.clone(),
        filters: cli.filters(),
        query: query.clone(),
        max_concurrency: cli.workers,
    };

    let probes = async {
        if !cli.no_recon {
            recon::run_probes(fetcher.as_ref(), &endpoints, &target, fetcher.timeout(), &output).await;
        }
    };
    let searching = search::run_search(Arc::clone(&fetcher), &endpoints, request, &output);

    // Wait for both, so probe files are on disk even when the search fails
    let ((), searched) = tokio::join!(probes, searching);

    let (query, store) = match (query, searched?) {
        (Some(query), Some(store)) => (query, store),
        _ => {
            println!("📦 Snapshots retrieved and saved to {}. Exiting...", output.root().display());
            return Ok(0);
        }
    };

    let results = store.into_results();
    print_results(&results, cli.json)?;

    match output.write_results(&query, &results) {
        Ok(path) => println!("💾 Results saved to {}", path.display()),
        Err(e) => warn!("failed to save search results: {}", e),
    }
    println!("⏱️  Took: {:.3} seconds", start.elapsed().as_secs_f64());

    Ok(0)
}

// The last non-empty line on stdin, for `echo https://e.com | wayback-search --term x`
fn read_url_from_stdin() -> Result<String> {
    let mut url = String::new();
    for line in std::io::stdin().lock().lines() {
        let line = line.context("unable to read input")?;
        if !line.trim().is_empty() {
            url = line.trim().to_string();
        }
    }

    if url.is_empty() {
        anyhow::bail!("Missing input url.");
    }
    Ok(url)
}

fn validate_url(url: &str) -> Result<(), ArchiveError> {
    match Url::parse(url) {
        Ok(parsed) if !parsed.scheme().is_empty() && parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        _ => Err(ArchiveError::InvalidUrl(url.to_string())),
    }
}

fn print_results(results: &HashMap<String, Vec<String>>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_table(results);
    }
    Ok(())
}

fn print_table(results: &HashMap<String, Vec<String>>) {
    if results.is_empty() {
        println!("🔍 No matches found in any snapshot");
        return;
    }

    println!("{:<30} {:<8} {:<60}", "MATCH", "HITS", "FIRST SNAPSHOT");
    println!("{}", "=".repeat(98));

    let mut keys: Vec<&String> = results.keys().collect();
    keys.sort();

    for key in keys {
        let urls = &results[key];
        let key_display = if key.chars().count() > 27 {
            format!("{}...", key.chars().take(27).collect::<String>())
        } else {
            key.clone()
        };
        let first = urls.first().map(String::as_str).unwrap_or("");
        println!("{:<30} {:<8} {:<60}", key_display, urls.len(), first);
    }

    println!();
    println!("📊 Summary:");
    println!("   🔑 Distinct matches: {}", results.len());
    println!("   📄 Total hits: {}", results.values().map(Vec::len).sum::<usize>());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://example.com/path?q=1").is_ok());
        assert!(matches!(validate_url("example.com"), Err(ArchiveError::InvalidUrl(_))));
        assert!(matches!(validate_url(""), Err(ArchiveError::InvalidUrl(_))));
        assert!(matches!(validate_url("mailto:me@example.com"), Err(ArchiveError::InvalidUrl(_))));
    }
}
