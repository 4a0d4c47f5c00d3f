// src/search/query.rs
// =============================================================================
// What the user is looking for.
//
// Exactly one of three shapes per run:
// - Term: one literal substring
// - TermList: several literal substrings, checked independently
// - Pattern: a regular expression, every match collected
//
// "No search at all" is not a variant; callers hold an Option<Query>.
// =============================================================================

use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::ArchiveError;

#[derive(Debug, Clone)]
pub enum Query {
    Term(String),
    TermList(Vec<String>),
    Pattern(Regex),
}

impl Query {
    /// Builds the query from the three CLI inputs.
    ///
    /// Precedence: regex, then terms file, then single term. A bad pattern
    /// or unreadable file fails here, before any network work starts.
    pub fn from_inputs(
        regex: Option<&str>,
        terms_file: Option<&Path>,
        term: Option<&str>,
    ) -> Result<Option<Query>, ArchiveError> {
        if let Some(pattern) = regex.filter(|p| !p.is_empty()) {
            return Ok(Some(Query::Pattern(Regex::new(pattern)?)));
        }
        if let Some(path) = terms_file {
            return Ok(Some(Query::TermList(read_terms_file(path)?)));
        }
        if let Some(term) = term.filter(|t| !t.is_empty()) {
            return Ok(Some(Query::Term(term.to_string())));
        }
        Ok(None)
    }

    /// File the results of this kind of query are written to.
    pub fn result_file_name(&self) -> &'static str {
        match self {
            Query::Term(_) => "term_results.json",
            Query::TermList(_) => "terms_results.json",
            Query::Pattern(_) => "regex_results.json",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Query::Term(term) => format!("term {:?}", term),
            Query::TermList(terms) => format!("{} term(s)", terms.len()),
            Query::Pattern(re) => format!("pattern /{}/", re.as_str()),
        }
    }
}

/// One term per line; blank lines are skipped.
fn read_terms_file(path: &Path) -> Result<Vec<String>, ArchiveError> {
    let content = fs::read_to_string(path).map_err(|source| ArchiveError::TermsFile {
        path: path.display().to_string(),
        source,
    })?;

    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}
