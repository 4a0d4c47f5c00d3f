// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// One command, many flags:
// - what to search for: --regex, --terms <file>, --term
// - which snapshots: --from, --to, --limit, mimetype / status filters,
//   and one of --domain / --host / --prefix
// - how: --workers (concurrent fetches), --timeout (per request, ms)
// - where: --out (output directory), --json (print results as JSON)
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser};

use crate::archive::{Filters, MatchType};
use crate::search::DEFAULT_CONCURRENCY;

#[derive(Parser, Debug)]
#[command(
    name = "wayback-search",
    version = "0.1.0",
    about = "Search every Wayback Machine snapshot of a URL for terms or patterns",
    long_about = "wayback-search lists the archived snapshots of a URL, downloads them \
                  concurrently and reports which snapshots contain your term, terms or regex. \
                  Without a query it only saves the snapshot index."
)]
#[command(group(
    ArgGroup::new("match_type")
        .args(["domain", "host", "prefix"])
        .multiple(false)
))]
pub struct Cli {
    /// URL to search (read from stdin when omitted)
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Regex pattern to search the snapshots for
    #[arg(long)]
    pub regex: Option<String>,

    /// File with one search term per line
    #[arg(long)]
    pub terms: Option<PathBuf>,

    /// Single term to search the snapshots for
    #[arg(long)]
    pub term: Option<String>,

    /// Maximum number of snapshots fetched at once
    #[arg(short = 'g', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub workers: usize,

    /// Timeout for each request, in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub timeout: u64,

    /// Search from here, at least a year (yyyyMMddhhmmss for more detail)
    #[arg(short = 'f', long)]
    pub from: Option<String>,

    /// Search up to here, at least a year (yyyyMMddhhmmss for more detail)
    #[arg(short = 't', long)]
    pub to: Option<String>,

    /// Limit results: -1, -2, ... for most recent, 1, 2, ... for oldest
    #[arg(short = 'l', long, default_value_t = 0, allow_hyphen_values = true)]
    pub limit: i64,

    /// Only keep snapshots with this mimetype
    #[arg(short = 'm', long, default_value = "text/html")]
    pub mimetype: String,

    /// Drop snapshots with this mimetype (overrides --mimetype)
    #[arg(long)]
    pub not_mimetype: Option<String>,

    /// Only keep snapshots with this status code
    #[arg(short = 's', long, default_value = "200")]
    pub status: String,

    /// Drop snapshots with this status code (overrides --status)
    #[arg(long)]
    pub not_status: Option<String>,

    /// Return results from the host and all subhosts
    #[arg(long)]
    pub domain: bool,

    /// Return results from the host only
    #[arg(long)]
    pub host: bool,

    /// Return results for everything under the path
    #[arg(long)]
    pub prefix: bool,

    /// Directory where results and data/ files are written
    #[arg(short = 'o', long, default_value = ".")]
    pub out: PathBuf,

    /// Skip the DNS, WHOIS, timemap and robots/sitemap probes
    #[arg(long)]
    pub no_recon: bool,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn filters(&self) -> Filters {
        Filters {
            from: self.from.clone(),
            to: self.to.clone(),
            limit: self.limit,
            mimetype: self.mimetype.clone(),
            not_mimetype: self.not_mimetype.clone(),
            status_code: self.status.clone(),
            not_status_code: self.not_status.clone(),
            match_type: MatchType::from_flags(self.domain, self.host, self.prefix),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}
