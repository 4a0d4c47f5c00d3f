// src/search/mod.rs
// =============================================================================
// The search engine: from a target URL to a map of matches.
//
// Submodules:
// - query: what we look for (term, term list, regex)
// - matcher: runs a query over one page
// - store: thread-safe term -> URLs map
// - dispatch: bounded concurrent fetch + match over all snapshots
//
// run_search() below is the whole pipeline in order:
//   index URL -> fetch index -> save it -> parse -> dispatch -> results
// =============================================================================

mod dispatch;
mod matcher;
mod query;
mod store;

pub use dispatch::{Dispatcher, DEFAULT_CONCURRENCY};
pub use query::Query;
pub use store::ResultStore;

use std::sync::Arc;

use tracing::{info, warn};

use crate::archive::{build_index_url, parse_snapshots, timestamps, Endpoints, Fetch, Filters};
use crate::error::ArchiveError;
use crate::output::{Output, SNAPSHOTS_FILE};

/// Everything one search run needs besides the fetcher and the sink.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub target: String,
    pub filters: Filters,
    pub query: Option<Query>,
    pub max_concurrency: usize,
}

/// Runs the full pipeline for one target URL.
///
/// Returns `Ok(None)` when there is no query: the index is still fetched and
/// saved, but no snapshot is downloaded. Any failure to get a usable index
/// is an error; failures on single snapshots are not.
pub async fn run_search<F>(
    fetcher: Arc<F>,
    endpoints: &Endpoints,
    request: SearchRequest,
    output: &Output,
) -> Result<Option<ResultStore>, ArchiveError>
where
    F: Fetch + 'static,
{
    let index_url = build_index_url(&endpoints.index_base, &request.target, &request.filters);
    info!("Wayback Machine URL: {}", index_url);

    let raw = fetcher.fetch(&index_url).await?;

    // Saved before parsing so a later failure keeps what we downloaded.
    // The index itself is fine either way, so a failed save does not stop us.
    if let Err(e) = output.write_data(SNAPSHOTS_FILE, &raw) {
        warn!("unable to save {}: {}", SNAPSHOTS_FILE, e);
    }

    let snapshots = parse_snapshots(&raw)?;
    info!("Found {} snapshot(s).", snapshots.len());

    let query = match request.query {
        Some(query) => query,
        None => return Ok(None),
    };
    info!("Searching {} snapshot(s) for {}", snapshots.len(), query.describe());

    let dispatcher = Dispatcher::new(fetcher, endpoints.clone(), request.max_concurrency);
    let store = dispatcher
        .run(timestamps(&snapshots), &request.target, Arc::new(query))
        .await;

    Ok(Some(store))
}
