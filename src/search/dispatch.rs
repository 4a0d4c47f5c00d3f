// src/search/dispatch.rs
// =============================================================================
// Fetches every snapshot and searches it, a bounded number at a time.
//
// How it works:
// 1. A semaphore holds `max_concurrency` permits
// 2. For each timestamp we wait for a permit, then spawn a task
// 3. The task fetches the page and gives the permit back right away,
//    success or failure, so matching runs outside the bound
// 4. A failed fetch is logged and that snapshot simply adds nothing
// 5. We join every task before handing back the results
//
// Archives 404 or time out on single captures all the time. One bad
// snapshot never stops the others.
// =============================================================================

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::matcher::match_page;
use super::query::Query;
use super::store::ResultStore;
use crate::archive::{Endpoints, Fetch};

/// Default number of snapshot fetches in flight.
pub const DEFAULT_CONCURRENCY: usize = 10;

pub struct Dispatcher<F> {
    fetcher: Arc<F>,
    endpoints: Endpoints,
    max_concurrency: usize,
}

impl<F> Dispatcher<F>
where
    F: Fetch + 'static,
{
    /// A zero bound would never hand out a permit, so it is raised to one.
    pub fn new(fetcher: Arc<F>, endpoints: Endpoints, max_concurrency: usize) -> Self {
        Self {
            fetcher,
            endpoints,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Fetches and searches every snapshot of `target`, returning what matched.
    pub async fn run(&self, timestamps: Vec<String>, target: &str, query: Arc<Query>) -> ResultStore {
        let store = Arc::new(ResultStore::new());
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for timestamp in timestamps {
            // The semaphore is never closed, so this only fails if that changes
            let permit = match Arc::clone(&permits).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!("concurrency limiter closed, stopping dispatch: {}", e);
                    break;
                }
            };

            let url = self.endpoints.snapshot_url(&timestamp, target);
            let fetcher = Arc::clone(&self.fetcher);
            let query = Arc::clone(&query);
            let store = Arc::clone(&store);

            tasks.spawn(async move {
                let result = fetcher.fetch(&url).await;
                drop(permit);

                match result {
                    Ok(body) => {
                        debug!("fetched {} ({} bytes)", url, body.len());
                        let page: Arc<str> = Arc::from(String::from_utf8_lossy(&body));
                        match_page(page, &url, &query, &store).await;
                    }
                    Err(e) => warn!("getData error for {}: {}", url, e),
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("snapshot task failed: {}", e);
            }
        }

        // Every task has been joined, so ours is the last reference
        Arc::try_unwrap(store).unwrap_or_else(|shared| {
            let store = ResultStore::new();
            for (key, urls) in shared.snapshot() {
                for url in urls {
                    store.store(&key, &url);
                }
            }
            store
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use regex::Regex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const TARGET: &str = "http://e.com";

    fn endpoints() -> Endpoints {
        Endpoints {
            archive_base: "https://archive".to_string(),
            ..Endpoints::default()
        }
    }

    /// Serves fixed pages; unknown URLs are 404s.
    struct MapFetcher {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl Fetch for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.pages
                .get(url)
                .map(|p| p.as_bytes().to_vec())
                .ok_or(FetchError::Status { code: 404 })
        }
    }

    /// Sleeps on every fetch and records the peak number in flight.
    struct SlowFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl Fetch for SlowFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(b"page".to_vec())
        }
    }

    fn timestamps(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("2020010100{:04}", i)).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_in_flight_fetches_never_exceed_bound() {
        let fetcher = Arc::new(SlowFetcher {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            delay: Duration::from_millis(20),
        });
        let dispatcher = Dispatcher::new(Arc::clone(&fetcher), endpoints(), 3);

        let store = dispatcher
            .run(timestamps(20), TARGET, Arc::new(Query::Term("page".into())))
            .await;

        assert!(fetcher.peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(fetcher.in_flight.load(Ordering::SeqCst), 0);
        // All 20 tasks ran to completion before run() returned
        assert_eq!(store.into_results()["page"].len(), 20);
    }

    /// One URL hangs far longer than the rest; the others answer at once.
    struct StallingFetcher {
        stalled: String,
        delay: Duration,
    }

    #[async_trait]
    impl Fetch for StallingFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            if url == self.stalled {
                tokio::time::sleep(self.delay).await;
                return Err(FetchError::Status { code: 504 });
            }
            Ok(b"hello abc".to_vec())
        }
    }

    #[tokio::test]
    async fn test_slow_snapshot_does_not_hold_back_others() {
        let ts = timestamps(6);
        let stalled = endpoints().snapshot_url(&ts[0], TARGET);
        let fetcher = Arc::new(StallingFetcher {
            stalled: stalled.clone(),
            delay: Duration::from_millis(500),
        });
        let dispatcher = Dispatcher::new(fetcher, endpoints(), 2);

        let started = std::time::Instant::now();
        let results = dispatcher
            .run(ts.clone(), TARGET, Arc::new(Query::Term("abc".into())))
            .await
            .into_results();

        // Five fast snapshots all arrive through the one free permit
        let mut urls = results["abc"].clone();
        urls.sort();
        let mut expected: Vec<String> = ts[1..]
            .iter()
            .map(|t| endpoints().snapshot_url(t, TARGET))
            .collect();
        expected.sort();
        assert_eq!(urls, expected);
        assert!(!urls.contains(&stalled));
        // The slow one was waited for, not abandoned
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_failed_snapshots_do_not_affect_others() {
        let ts = timestamps(5);
        let mut pages = HashMap::new();
        // Only snapshots 1 and 3 exist; the rest 404
        for i in [1, 3] {
            pages.insert(endpoints().snapshot_url(&ts[i], TARGET), "hello abc".to_string());
        }
        let dispatcher = Dispatcher::new(Arc::new(MapFetcher { pages }), endpoints(), 2);

        let results = dispatcher
            .run(ts.clone(), TARGET, Arc::new(Query::Term("abc".into())))
            .await
            .into_results();

        let mut urls = results["abc"].clone();
        urls.sort();
        assert_eq!(
            urls,
            vec![
                endpoints().snapshot_url(&ts[1], TARGET),
                endpoints().snapshot_url(&ts[3], TARGET),
            ]
        );
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_raised_to_one() {
        let ts = timestamps(1);
        let mut pages = HashMap::new();
        pages.insert(endpoints().snapshot_url(&ts[0], TARGET), "abc".to_string());
        let dispatcher = Dispatcher::new(Arc::new(MapFetcher { pages }), endpoints(), 0);

        let store = dispatcher
            .run(ts, TARGET, Arc::new(Query::Term("abc".into())))
            .await;

        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn test_pattern_collapses_repeats_per_page() {
        let ts = vec!["20200101000000".to_string()];
        let url = "https://archive/web/20200101000000/http://e.com".to_string();
        let mut pages = HashMap::new();
        pages.insert(url.clone(), "a1 b22 a1".to_string());
        let dispatcher = Dispatcher::new(Arc::new(MapFetcher { pages }), endpoints(), 1);

        let results = dispatcher
            .run(ts, TARGET, Arc::new(Query::Pattern(Regex::new(r"\d+").unwrap())))
            .await
            .into_results();

        assert_eq!(results.len(), 2);
        assert_eq!(results["1"], vec![url.clone()]);
        assert_eq!(results["22"], vec![url]);
    }
}
