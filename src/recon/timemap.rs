// src/recon/timemap.rs
// =============================================================================
// Lists every URL ever captured under the target prefix (the "timemap"),
// saves it, and splits it by whether a URL was captured with a single
// unique digest or several.
// =============================================================================

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::archive::{Endpoints, Fetch};
use crate::output::Output;

const FIELDS: [&str; 6] = [
    "original",
    "mimetype",
    "timestamp",
    "endtimestamp",
    "groupcount",
    "uniqcount",
];
const UNIQCOUNT: usize = 5;

pub fn timemap_url(endpoints: &Endpoints, url: &str, now_millis: u128) -> String {
    format!(
        "{}?url={}&matchType=prefix&collapse=urlkey&output=json\
         &fl=original%2Cmimetype%2Ctimestamp%2Cendtimestamp%2Cgroupcount%2Cuniqcount\
         &filter=!statuscode%3A%5B45%5D..&limit=10000&_={}",
        endpoints.timemap_base, url, now_millis
    )
}

/// Splits timemap rows (header first) into (unique, multiple), each
/// starting with the field header again.
pub fn split_by_uniqueness(rows: Vec<Vec<String>>) -> (Vec<Vec<String>>, Vec<Vec<String>>) {
    let header: Vec<String> = FIELDS.iter().map(|f| f.to_string()).collect();
    let mut unique = vec![header.clone()];
    let mut multiple = vec![header];

    // skip the key
    for row in rows.into_iter().skip(1) {
        match row.get(UNIQCOUNT).map(String::as_str) {
            Some("1") => unique.push(row),
            Some(_) => multiple.push(row),
            None => warn!("skipping short timemap row: {:?}", row),
        }
    }

    (unique, multiple)
}

pub async fn archived_urls<F: Fetch + ?Sized>(fetcher: &F, endpoints: &Endpoints, url: &str, output: &Output) {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let request = timemap_url(endpoints, url, now);

    let body = match fetcher.fetch(&request).await {
        Ok(body) if body.is_empty() => {
            warn!("no archived links on web.archive.org");
            return;
        }
        Ok(body) => body,
        Err(e) => {
            warn!("archivedURLs unsuccessful: {}", e);
            return;
        }
    };

    if let Err(e) = output.write_data("data/archived_urls.json", &body) {
        warn!("unable to save archived URLs: {}", e);
    }

    info!("Sorting URLs.");
    let rows: Vec<Vec<String>> = match serde_json::from_slice(&body) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("timemap unmarshal error: {}", e);
            return;
        }
    };

    let (unique, multiple) = split_by_uniqueness(rows);
    // Both files are written even when only the header row is left
    for (name, rows) in [("data/unique.json", unique), ("data/multiple.json", multiple)] {
        let written = serde_json::to_vec(&rows)
            .map_err(crate::error::ArchiveError::from)
            .and_then(|bytes| output.write_data(name, &bytes));
        if let Err(e) = written {
            warn!("unable to save {}: {}", name, e);
        }
    }
}
