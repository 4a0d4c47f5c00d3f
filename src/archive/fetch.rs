// src/archive/fetch.rs
// =============================================================================
// One HTTP GET, done carefully.
//
// Every call:
// - gets its own timeout (a slow capture only hurts itself)
// - sends a User-Agent picked at random from a small pool, per request
// - succeeds only on exactly 200 and a fully read body
//
// The `Fetch` trait is the seam the dispatcher and the pipeline are written
// against, so tests can swap the network for an in-memory map.
// =============================================================================

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::{header::USER_AGENT, Client, StatusCode};
use std::time::Duration;

use crate::error::FetchError;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4692.56 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4889.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/603.3.8 (KHTML, like Gecko)",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_6) AppleWebKit/601.7.7 (KHTML, like Gecko) Version/9.1.2 Safari/601.7.7",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/101.0.4951.54 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:99.0) Gecko/20100101 Firefox/99.0",
    "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/99.0.4844.51 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/99.0.4844.84 Safari/537.36",
];

/// Anything that can turn a URL into bytes.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Picks a user agent uniformly at random.
///
/// The thread-local RNG is not `Send`, so it never lives across an `.await`.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// The real fetcher, backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    /// Builds the client once; the connection pool is shared by every task.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Fetch for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, random_user_agent())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                code: response.status().as_u16(),
            });
        }

        // bytes() drains the whole body or fails; nothing partial escapes
        let body = response.bytes().await.map_err(FetchError::BodyRead)?;
        Ok(body.to_vec())
    }
}

fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_builder() {
        FetchError::Request {
            url: url.to_string(),
            source: error,
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
