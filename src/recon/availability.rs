// src/recon/availability.rs
// =============================================================================
// Asks the availability API whether a URL was ever archived, and if so,
// saves the closest capture of robots.txt / sitemap.xml.
//
// The API answers with:
//   {"archived_snapshots": {"closest": {"available": true, "url": "...",
//                                       "timestamp": "...", "status": "200"}}}
// and with an empty "archived_snapshots" object when nothing exists.
// =============================================================================

use serde::Deserialize;
use tracing::{info, warn};

use crate::archive::{Endpoints, Fetch};
use crate::output::Output;

#[derive(Debug, Default, Deserialize)]
pub struct Availability {
    #[serde(default)]
    pub archived_snapshots: ArchivedSnapshots,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArchivedSnapshots {
    pub closest: Option<Closest>,
}

#[derive(Debug, Deserialize)]
pub struct Closest {
    #[serde(default)]
    pub available: bool,
    pub url: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub status: String,
}

impl Availability {
    /// The closest capture, when the API says there is one.
    pub fn closest(&self) -> Option<&Closest> {
        self.archived_snapshots.closest.as_ref().filter(|c| c.available)
    }
}

/// Returns the closest archived capture of `url`, or `None`.
///
/// Errors are logged and read as "not available".
pub async fn check_available<F: Fetch + ?Sized>(
    fetcher: &F,
    endpoints: &Endpoints,
    url: &str,
) -> Option<String> {
    let request = format!("{}?url={}", endpoints.availability_base, url);
    info!("checking: {}", request);

    let body = match fetcher.fetch(&request).await {
        Ok(body) => body,
        Err(e) => {
            warn!("unable to get {}: {}", request, e);
            return None;
        }
    };

    let availability: Availability = match serde_json::from_slice(&body) {
        Ok(a) => a,
        Err(e) => {
            warn!("{} unmarshal error: {}", request, e);
            return None;
        }
    };

    match availability.closest() {
        Some(closest) => {
            info!(
                "{} archived at {} (status {})",
                url, closest.timestamp, closest.status
            );
            Some(closest.url.clone())
        }
        None => {
            info!("{} not available", url);
            None
        }
    }
}

/// `https://e.com/` + `data/robots.txt` -> `https://e.com/robots.txt`
pub fn asset_url(url: &str, filename: &str) -> String {
    let base = url.trim_end_matches('/');
    if filename.ends_with("robots.txt") {
        format!("{}/robots.txt", base)
    } else {
        format!("{}/sitemap.xml", base)
    }
}

/// Saves the closest archived copy of one site asset to `filename`.
pub async fn probe_asset<F: Fetch + ?Sized>(
    fetcher: &F,
    endpoints: &Endpoints,
    url: &str,
    filename: &str,
    output: &Output,
) {
    let asset = asset_url(url, filename);

    let Some(archived) = check_available(fetcher, endpoints, &asset).await else {
        return;
    };

    match fetcher.fetch(&archived).await {
        Ok(body) if body.is_empty() => warn!("no data at {}", archived),
        Ok(body) => {
            if let Err(e) = output.write_data(filename, &body) {
                warn!("unable to save {}: {}", filename, e);
            }
        }
        Err(e) => warn!("unable to get {}: {}", archived, e),
    }
}
