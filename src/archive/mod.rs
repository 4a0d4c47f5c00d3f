// src/archive/mod.rs
// =============================================================================
// Talking to the Wayback Machine.
//
// Submodules:
// - cdx: builds index (CDX) query URLs from filters
// - snapshots: parses the index answer into records
// - fetch: one HTTP GET with timeout and random user agent
// =============================================================================

mod cdx;
mod fetch;
mod snapshots;

pub use cdx::{build_index_url, Endpoints, Filters, MatchType};
pub use fetch::{Fetch, PageFetcher};
pub use snapshots::{parse_snapshots, timestamps};
