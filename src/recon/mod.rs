// src/recon/mod.rs
// =============================================================================
// Side probes that run next to the main search. None of them can fail the
// run: every problem is logged and the probe just saves nothing.
//
// Submodules:
// - availability: closest archived robots.txt / sitemap.xml
// - timemap: every captured URL under the target prefix
// - lookup: DNS and WHOIS about the target host
// =============================================================================

mod availability;
mod lookup;
mod timemap;

use lookup::{domain_of, host_of};

use std::time::Duration;

use tracing::warn;

use crate::archive::{Endpoints, Fetch};
use crate::output::Output;

/// Runs every probe concurrently and returns when all are done.
pub async fn run_probes<F: Fetch + ?Sized>(
    fetcher: &F,
    endpoints: &Endpoints,
    url: &str,
    timeout: Duration,
    output: &Output,
) {
    let ip = async {
        match host_of(url) {
            Ok(host) => lookup::lookup_ip(&host, output).await,
            Err(e) => warn!("getHost error: {}", e),
        }
    };

    let whois = async {
        match domain_of(url) {
            Ok(domain) => lookup::whois_lookup(&domain, timeout, output).await,
            Err(e) => warn!("getDomain error: {}", e),
        }
    };

    futures::join!(
        ip,
        whois,
        timemap::archived_urls(fetcher, endpoints, url, output),
        availability::probe_asset(fetcher, endpoints, url, "data/robots.txt", output),
        availability::probe_asset(fetcher, endpoints, url, "data/sitemap.xml", output),
    );
}
