// src/search/matcher.rs
// =============================================================================
// Runs a Query against the text of one archived page.
//
// - Pattern: every non-overlapping match, each distinct string stored once
//   per page (a "seen" set per call)
// - Term: stored if the page contains it; an empty term does nothing
// - TermList: one task per distinct term, all joined before we return
//
// The page is searched as plain text. No HTML parsing.
// =============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::query::Query;
use super::store::ResultStore;

/// Searches `page` and records every hit as (matched string, `source_url`).
pub async fn match_page(page: Arc<str>, source_url: &str, query: &Query, store: &Arc<ResultStore>) {
    match query {
        Query::Pattern(re) => match_pattern(&page, source_url, re, store),
        Query::Term(term) => match_term(&page, source_url, term, store),
        Query::TermList(terms) => match_terms(page, source_url, terms, store).await,
    }
}

fn match_pattern(page: &str, source_url: &str, re: &Regex, store: &ResultStore) {
    let mut seen = HashSet::new();

    for found in re.find_iter(page) {
        // insert() is false for repeats on this page
        if seen.insert(found.as_str()) {
            store.store(found.as_str(), source_url);
        }
    }

    if seen.is_empty() {
        debug!("no matches for /{}/ at {}", re.as_str(), source_url);
    }
}

fn match_term(page: &str, source_url: &str, term: &str, store: &ResultStore) {
    if term.is_empty() {
        debug!("empty term, nothing to search for at {}", source_url);
        return;
    }

    if page.contains(term) {
        debug!("found {} at {}", term, source_url);
        store.store(term, source_url);
    } else {
        debug!("failed to find {} at {}", term, source_url);
    }
}

async fn match_terms(page: Arc<str>, source_url: &str, terms: &[String], store: &Arc<ResultStore>) {
    let mut checks = JoinSet::new();
    let mut seen = HashSet::new();

    for term in terms {
        // A repeated term would store this page twice under the same key
        if !seen.insert(term.as_str()) {
            continue;
        }

        let page = Arc::clone(&page);
        let store = Arc::clone(store);
        let term = term.clone();
        let source_url = source_url.to_string();

        checks.spawn(async move {
            match_term(&page, &source_url, &term, &store);
        });
    }

    // Every term check for this page finishes before we return
    while let Some(joined) = checks.join_next().await {
        if let Err(e) = joined {
            warn!("term check task failed for {}: {}", source_url, e);
        }
    }
}
