// src/error.rs
// =============================================================================
// Typed errors for the archive and search layers.
//
// Two families:
// - FetchError: one HTTP GET went wrong. For archived pages these are always
//   recovered locally (logged, the snapshot contributes nothing).
// - ArchiveError: something that stops a whole run, like a bad target URL or
//   an index we cannot get or read.
//
// main.rs works with anyhow::Result and only turns these into messages and
// exit codes.
// =============================================================================

use thiserror::Error;

/// Failure of a single HTTP fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client itself could not be set up (TLS backend, config).
    #[error("unable to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be built (bad URL, bad header value).
    #[error("invalid request for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Connection failure or timeout.
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Anything other than exactly 200.
    #[error("status code: {code}")]
    Status { code: u16 },

    /// The body could not be drained. Bytes read so far are discarded.
    #[error("unable to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{0} is not a valid URL, please try again")]
    InvalidUrl(String),

    #[error("unable to fetch the snapshot index: {0}")]
    Fetch(#[from] FetchError),

    #[error("unmarshal error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no wayback machine snapshots found. If using limit=-1, try limit=-2")]
    EmptyResult,

    #[error("invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("unable to read terms file {path}: {source}")]
    TermsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
