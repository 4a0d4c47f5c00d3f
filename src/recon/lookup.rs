// src/recon/lookup.rs
// =============================================================================
// Network lookups about the target itself (not the archive):
// - IP addresses of the host (DNS)
// - WHOIS record of the domain from whois.iana.org
// =============================================================================

use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;
use tracing::{info, warn};
use url::Url;

use crate::output::Output;

const WHOIS_SERVER: &str = "whois.iana.org:43";

/// Host part of a URL: `https://www.e.com/a` -> `www.e.com`
pub fn host_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("URL has no host: {}", url))
}

/// Domain for WHOIS: the host without a leading `www` label.
pub fn domain_of(url: &str) -> Result<String> {
    let host = host_of(url)?;
    match host.split_once('.') {
        Some((first, rest)) if first.starts_with("www") => Ok(rest.to_string()),
        _ => Ok(host),
    }
}

/// Resolves `host` and saves one address per line to `data/ip.txt`.
pub async fn lookup_ip(host: &str, output: &Output) {
    let addrs = match lookup_host((host, 0)).await {
        Ok(addrs) => addrs,
        Err(e) => {
            warn!("unable to look up IP for {}: {}", host, e);
            return;
        }
    };

    let mut lines = String::new();
    for addr in addrs {
        lines.push_str(&addr.ip().to_string());
        lines.push('\n');
    }

    if lines.is_empty() {
        info!("no addresses for {}", host);
        return;
    }
    if let Err(e) = output.write_data("data/ip.txt", lines.as_bytes()) {
        warn!("unable to save IP list: {}", e);
    }
}

/// Queries the IANA WHOIS server for `domain` and saves the answer.
pub async fn whois_lookup(domain: &str, limit: Duration, output: &Output) {
    let answer = match timeout(limit, query_whois(WHOIS_SERVER, domain)).await {
        Ok(Ok(answer)) => answer,
        Ok(Err(e)) => {
            warn!("whois failure: {}", e);
            return;
        }
        Err(_) => {
            warn!("whois timed out after {:?}", limit);
            return;
        }
    };

    if answer.is_empty() {
        info!("No results for whois.");
        return;
    }
    if let Err(e) = output.write_data("data/whois.txt", &answer) {
        warn!("unable to save whois answer: {}", e);
    }
}

async fn query_whois(server: &str, domain: &str) -> Result<Vec<u8>> {
    let mut conn = TcpStream::connect(server).await?;
    conn.write_all(format!("{}\r\n", domain).as_bytes()).await?;

    // The server closes the connection when it is done
    let mut answer = Vec::new();
    conn.read_to_end(&mut answer).await?;
    Ok(answer)
}
