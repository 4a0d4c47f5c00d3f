// src/archive/cdx.rs
// =============================================================================
// Builds the request URL for the Wayback Machine CDX (index) server.
//
// The CDX server answers with one row per capture of a URL. We shape that
// answer with filters:
// - from / to: archive timestamp prefixes ("2019", "20190301", ...)
// - limit: negative = N most recent, positive = N oldest, 0 = everything
// - mimetype / statuscode: include OR exclude (the exclusion wins)
// - matchType: widen the lookup to a domain, host or path prefix
//
// Everything here is plain string building. No network, no validation.
// Empty values ("from=") mean "no bound" to the CDX server, so defaults are
// safe to emit as-is.
// =============================================================================

use std::fmt;

/// Base URLs of every archive service we talk to.
///
/// Tests point these at fake hosts; the real tool uses `Default`.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// CDX search endpoint
    pub index_base: String,
    /// Availability API ("is there a closest snapshot?")
    pub availability_base: String,
    /// Root used to build `<root>/web/<timestamp>/<url>` page URLs
    pub archive_base: String,
    /// Timemap endpoint listing every captured URL under a prefix
    pub timemap_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            index_base: "http://web.archive.org/cdx/search/cdx".to_string(),
            availability_base: "http://archive.org/wayback/available".to_string(),
            archive_base: "https://web.archive.org".to_string(),
            timemap_base: "https://web.archive.org/web/timemap/json".to_string(),
        }
    }
}

impl Endpoints {
    /// URL of one archived capture: `<archive-base>/web/<timestamp>/<original>`
    pub fn snapshot_url(&self, timestamp: &str, original: &str) -> String {
        format!("{}/web/{}/{}", self.archive_base, timestamp, original)
    }
}

/// How wide the index lookup is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    /// Host and all subhosts
    Domain,
    /// Exactly this host
    Host,
    /// Everything under this path
    Prefix,
}

impl MatchType {
    /// Picks one match type from the three CLI switches.
    ///
    /// The CLI already rejects combinations, but if more than one is set
    /// the precedence is domain, then host, then prefix.
    pub fn from_flags(domain: bool, host: bool, prefix: bool) -> Option<Self> {
        if domain {
            Some(MatchType::Domain)
        } else if host {
            Some(MatchType::Host)
        } else if prefix {
            Some(MatchType::Prefix)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Domain => "domain",
            MatchType::Host => "host",
            MatchType::Prefix => "prefix",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters applied to the index query.
#[derive(Debug, Clone)]
pub struct Filters {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Passed to the server untouched; the sign convention is the server's.
    pub limit: i64,
    pub mimetype: String,
    pub not_mimetype: Option<String>,
    pub status_code: String,
    pub not_status_code: Option<String>,
    pub match_type: Option<MatchType>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            limit: 0,
            mimetype: "text/html".to_string(),
            not_mimetype: None,
            status_code: "200".to_string(),
            not_status_code: None,
            match_type: None,
        }
    }
}

/// Builds the CDX request URL for `target` under `filters`.
///
/// Example (all defaults):
///   `<base>?output=json&fastLatest=true&url=example.com&from=&to=&limit=0
///    &collapse=digest&filter=mimetype:text/html&filter=statuscode:200`
pub fn build_index_url(index_base: &str, target: &str, filters: &Filters) -> String {
    let mut url = format!(
        "{}?output=json&fastLatest=true&url={}&from={}&to={}&limit={}&collapse=digest",
        index_base,
        target,
        filters.from.as_deref().unwrap_or(""),
        filters.to.as_deref().unwrap_or(""),
        filters.limit,
    );

    // Exclusion beats inclusion for each dimension
    match non_empty(&filters.not_mimetype) {
        Some(excluded) => url.push_str(&format!("&filter=!mimetype:{}", excluded)),
        None => url.push_str(&format!("&filter=mimetype:{}", filters.mimetype)),
    }
    match non_empty(&filters.not_status_code) {
        Some(excluded) => url.push_str(&format!("&filter=!statuscode:{}", excluded)),
        None => url.push_str(&format!("&filter=statuscode:{}", filters.status_code)),
    }

    if let Some(match_type) = filters.match_type {
        url.push_str(&format!("&matchType={}", match_type));
    }

    url
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://index.test/cdx";

    #[test]
    fn test_default_filters_url() {
        let url = build_index_url(BASE, "example.com", &Filters::default());
        assert_eq!(
            url,
            "http://index.test/cdx?output=json&fastLatest=true&url=example.com\
             &from=&to=&limit=0&collapse=digest\
             &filter=mimetype:text/html&filter=statuscode:200"
        );
    }

    #[test]
    fn test_time_range_and_negative_limit_pass_through() {
        let filters = Filters {
            from: Some("2019".to_string()),
            to: Some("20200301".to_string()),
            limit: -3,
            ..Filters::default()
        };
        let url = build_index_url(BASE, "example.com", &filters);
        assert!(url.contains("&from=2019&to=20200301&limit=-3&"));
    }

    #[test]
    fn test_exclusions_replace_inclusions() {
        let filters = Filters {
            not_mimetype: Some("image/png".to_string()),
            not_status_code: Some("404".to_string()),
            ..Filters::default()
        };
        let url = build_index_url(BASE, "example.com", &filters);
        assert!(url.contains("&filter=!mimetype:image/png"));
        assert!(url.contains("&filter=!statuscode:404"));
        assert!(!url.contains("&filter=mimetype:"));
        assert!(!url.contains("&filter=statuscode:"));
    }

    #[test]
    fn test_empty_exclusion_is_ignored() {
        let filters = Filters {
            not_mimetype: Some(String::new()),
            ..Filters::default()
        };
        let url = build_index_url(BASE, "example.com", &filters);
        assert!(url.contains("&filter=mimetype:text/html"));
    }

    #[test]
    fn test_single_match_type_clause() {
        let filters = Filters {
            match_type: Some(MatchType::Host),
            ..Filters::default()
        };
        let url = build_index_url(BASE, "example.com", &filters);
        assert!(url.ends_with("&matchType=host"));
        assert_eq!(url.matches("matchType").count(), 1);
    }

    #[test]
    fn test_match_type_precedence() {
        assert_eq!(MatchType::from_flags(true, true, true), Some(MatchType::Domain));
        assert_eq!(MatchType::from_flags(false, true, true), Some(MatchType::Host));
        assert_eq!(MatchType::from_flags(false, false, true), Some(MatchType::Prefix));
        assert_eq!(MatchType::from_flags(false, false, false), None);
    }

    #[test]
    fn test_snapshot_url() {
        let endpoints = Endpoints {
            archive_base: "https://archive".to_string(),
            ..Endpoints::default()
        };
        assert_eq!(
            endpoints.snapshot_url("20200101000000", "http://e.com"),
            "https://archive/web/20200101000000/http://e.com"
        );
    }
}
